//! Plain-text dashboard for test results.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Pass,
    Warn,
    Fail,
    /// Test preconditions not met
    Skip,
}

impl Severity {
    fn indicator(&self) -> &'static str {
        match self {
            Severity::Pass => "✔",
            Severity::Warn => "⚠",
            Severity::Fail => "✖",
            Severity::Skip => "·",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Severity::Skip | Severity::Pass => 0,
            Severity::Warn => 1,
            Severity::Fail => 2,
        }
    }

    pub fn max(a: Severity, b: Severity) -> Severity {
        if b.rank() > a.rank() {
            b
        } else {
            a
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Severity::Pass => "PASS",
            Severity::Warn => "WARN",
            Severity::Fail => "FAIL",
            Severity::Skip => "N/A",
        };
        write!(f, "{}", text)
    }
}

pub struct MetricLine {
    pub label: String,
    pub value: String,
    pub detail: String,
    pub severity: Severity,
}

pub struct Section {
    pub name: String,
    pub items: Vec<MetricLine>,
}

impl Section {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            items: Vec::new(),
        }
    }

    pub fn metric(
        mut self,
        label: &str,
        value: String,
        detail: impl Into<String>,
        severity: Severity,
    ) -> Self {
        self.items.push(MetricLine {
            label: label.to_string(),
            value,
            detail: detail.into(),
            severity,
        });
        self
    }

    pub fn severity(&self) -> Severity {
        self.items
            .iter()
            .fold(Severity::Pass, |acc, item| Severity::max(acc, item.severity))
    }
}

pub struct Dashboard {
    title: String,
    sections: Vec<Section>,
    status: Severity,
}

impl Dashboard {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            sections: Vec::new(),
            status: Severity::Pass,
        }
    }

    pub fn add_section(&mut self, section: Section) {
        self.status = Severity::max(self.status, section.severity());
        self.sections.push(section);
    }

    pub fn status(&self) -> Severity {
        self.status
    }

    pub fn render(&self) -> String {
        let headers = ["Section", "Metric", "Value", "Notes", "Status"];
        let mut widths = headers.map(str::len);
        for section in &self.sections {
            widths[0] = widths[0].max(section.name.len());
            for item in &section.items {
                widths[1] = widths[1].max(item.label.len());
                widths[2] = widths[2].max(item.value.chars().count());
                widths[3] = widths[3].max(item.detail.chars().count());
                widths[4] = widths[4].max(status_text(item.severity).chars().count());
            }
        }

        let mut output = String::new();
        output.push_str(&format!(
            "{} {} {}\n\n",
            self.status.indicator(),
            self.title,
            match self.status {
                Severity::Fail => "(critical issues detected)",
                Severity::Warn => "(warning signals found)",
                _ => "(no anomalies detected)",
            }
        ));

        output.push_str(&horizontal_rule(&widths));
        output.push_str(&row(&headers.map(String::from), &widths));
        output.push_str(&horizontal_rule(&widths));
        for section in &self.sections {
            for (idx, item) in section.items.iter().enumerate() {
                let name = if idx == 0 {
                    section.name.clone()
                } else {
                    String::new()
                };
                output.push_str(&row(
                    &[
                        name,
                        item.label.clone(),
                        item.value.clone(),
                        item.detail.clone(),
                        status_text(item.severity),
                    ],
                    &widths,
                ));
            }
            output.push_str(&horizontal_rule(&widths));
        }
        output
    }
}

fn status_text(severity: Severity) -> String {
    format!("{} {}", severity.indicator(), severity)
}

fn row(cells: &[String; 5], widths: &[usize; 5]) -> String {
    let mut line = String::from("|");
    for (cell, &width) in cells.iter().zip(widths) {
        line.push_str(&format!(" {} |", pad(cell, width)));
    }
    line.push('\n');
    line
}

fn horizontal_rule(widths: &[usize; 5]) -> String {
    let mut line = String::from("+");
    for &w in widths {
        line.push_str(&format!("{}+", "-".repeat(w + 2)));
    }
    line.push('\n');
    line
}

// Pads by character count so the status glyphs line up.
fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}
