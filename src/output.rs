use tabled::settings::Style;
use tabled::{Table, Tabled};

use rlv::CaseReport;

#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "#")]
    index: usize,
    action: String,
    subject: String,
    detail: String,
}

pub fn render_report(scenario: &str, report: &CaseReport) -> String {
    let rows: Vec<StepRow> = report
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| StepRow {
            index: i + 1,
            action: step.action.to_string(),
            subject: step.subject.clone(),
            detail: step.detail.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    format!("scenario '{}' passed:\n{}", scenario, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rlv::verifier::{CaseReport, StepAction, StepOutcome};

    #[test]
    fn test_render_report_includes_steps() {
        let report = CaseReport {
            steps: vec![
                StepOutcome {
                    action: StepAction::Apply,
                    subject: "okta_import_rule_0_create.tf.json".to_string(),
                    detail: "1 check(s) passed".to_string(),
                },
                StepOutcome {
                    action: StepAction::Plan,
                    subject: "okta_import_rule_0_create.tf.json".to_string(),
                    detail: "no changes".to_string(),
                },
            ],
        };

        let rendered = render_report("lifecycle", &report);
        assert!(rendered.contains("scenario 'lifecycle' passed"));
        assert!(rendered.contains("apply"));
        assert!(rendered.contains("no changes"));
    }
}
