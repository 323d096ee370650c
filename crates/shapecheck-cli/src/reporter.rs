use colored::Colorize;

use shapecheck_solver::{Mismatch, TypeError};

use crate::driver::{CheckOutcome, Description};

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render_check(&self, outcome: &CheckOutcome) -> String {
        match outcome {
            CheckOutcome::Conforms => self.format_ok("value conforms"),
            CheckOutcome::Mismatch(None) => self.format_mismatch("value does not conform"),
            CheckOutcome::Mismatch(Some(mismatch)) => self.format_explained(mismatch),
            CheckOutcome::TypeError { expr, error } => self.format_type_error(expr, error),
        }
    }

    pub fn render_description(&self, description: &Description) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} {}\n", self.label("type:"), description.expr));
        out.push_str(&format!(
            "{} {}\n",
            self.label("heads:"),
            description.heads.join(", ")
        ));
        out.push_str(&format!(
            "{} [{}]\n",
            self.label("subtypes:"),
            description.subtypes.join(", ")
        ));
        out.push_str(&format!(
            "{} {}",
            self.label("descriptor:"),
            description.descriptor
        ));
        out
    }

    pub fn format_type_error(&self, expr: &str, error: &TypeError) -> String {
        let category = error.kind().to_string();
        let category = if self.color {
            category.red().bold().to_string()
        } else {
            category
        };
        format!("{category}: {error}\n  in `{expr}`")
    }

    fn format_explained(&self, mismatch: &Mismatch) -> String {
        let path = mismatch.path_string();
        let path = if self.color {
            path.cyan().to_string()
        } else {
            path
        };
        format!(
            "{}\n  at {path}: {}",
            self.format_mismatch("value does not conform"),
            mismatch.reason
        )
    }

    fn format_ok(&self, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        text.green().bold().to_string()
    }

    fn format_mismatch(&self, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        text.yellow().bold().to_string()
    }

    fn label(&self, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        text.bold().to_string()
    }
}
