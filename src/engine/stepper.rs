use super::params::CipherParams;
use super::state::ChaoticState;

/// Advance the state one forward-Euler step of the Lorenz equations.
pub fn step(params: &CipherParams, state: ChaoticState) -> ChaoticState {
    let ChaoticState { x, y, z } = state;

    let dx = params.sigma() * (y - x) * params.dt();
    let dy = (x * (params.rho() - z) - y) * params.dt();
    let dz = (x * y - params.beta() * z) * params.dt();

    ChaoticState {
        x: x + dx,
        y: y + dy,
        z: z + dz,
    }
}

/// Run `count` steps, discarding every intermediate state.
pub fn advance(params: &CipherParams, mut state: ChaoticState, count: u32) -> ChaoticState {
    for _ in 0..count {
        state = step(params, state);
    }
    state
}
