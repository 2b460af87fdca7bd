use clap::Args;
use dermastudio_core::{RoutineChecklist, RoutineProgress, RoutineTemplate};
use serde::Serialize;

use crate::commands::CommandResult;

const COMMAND: &str = "routine";

#[derive(Debug, Clone, Args)]
pub struct RoutineArgs {
    #[arg(
        long,
        conflicts_with = "custom",
        required_unless_present = "custom",
        help = "Built-in routine: oily, dry or combination"
    )]
    pub template: Option<String>,
    #[arg(long, help = "Comma-separated custom routine steps")]
    pub custom: Option<String>,
    #[arg(long = "done", help = "Step completed today; repeat for several")]
    pub done: Vec<String>,
}

#[derive(Debug, Serialize)]
struct StepStatus<'a> {
    step: &'a str,
    done: bool,
}

#[derive(Debug, Serialize)]
struct RoutineView<'a> {
    steps: Vec<StepStatus<'a>>,
    progress: RoutineProgress,
}

pub fn run(args: RoutineArgs) -> CommandResult {
    let mut checklist = match (args.template.as_deref(), args.custom.as_deref()) {
        (Some(raw), _) => match raw.parse::<RoutineTemplate>() {
            Ok(template) => RoutineChecklist::from_template(template),
            Err(message) => return CommandResult::bad_request(COMMAND, message),
        },
        (None, Some(raw)) => RoutineChecklist::from_custom(raw),
        (None, None) => {
            return CommandResult::bad_request(COMMAND, "either --template or --custom is required");
        }
    };

    for step in &args.done {
        if let Err(error) = checklist.set_done(step, true) {
            return CommandResult::from_application_error(COMMAND, error.into());
        }
    }

    let progress = checklist.progress();
    let steps = checklist
        .steps()
        .iter()
        .map(|step| StepStatus { step, done: checklist.is_done(step) })
        .collect();
    let message = format!(
        "{}/{} steps done ({:.0}%)",
        progress.completed,
        progress.total,
        progress.ratio * 100.0
    );

    CommandResult::success_with_data(COMMAND, message, RoutineView { steps, progress })
}
