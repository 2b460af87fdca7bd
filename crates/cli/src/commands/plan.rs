use clap::Args;
use dermastudio_core::config::LoadOptions;
use dermastudio_core::domain::product::normalize_tag;
use dermastudio_core::{
    ConsultationInput, DeterministicRecommender, Recommender, SkinProfile, SkinType,
};

use crate::commands::client::read_register;
use crate::commands::{load_context, CommandResult, ScoreArgs};

const COMMAND: &str = "plan";

#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    #[arg(long, help = "Registered client id; supplies skin type and concerns")]
    pub client: Option<String>,
    #[arg(long, required_unless_present = "client")]
    pub skin_type: Option<String>,
    #[arg(long = "concern", value_delimiter = ',')]
    pub concerns: Vec<String>,
    #[arg(long)]
    pub budget: u64,
    #[command(flatten)]
    pub scores: ScoreArgs,
}

/// Budget allocation and score-routed routine for one consultation.
pub fn run(options: LoadOptions, args: PlanArgs) -> CommandResult {
    let (config, catalog) = match load_context(COMMAND, options) {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let mut profile = match (args.client.as_deref(), args.skin_type.as_deref()) {
        (Some(client_id), _) => {
            let clients = match read_register(&config.clients.path) {
                Ok(clients) => clients,
                Err(error) => return CommandResult::from_application_error(COMMAND, error),
            };
            let wanted = client_id.trim();
            let found =
                clients.iter().find(|client| client.id.0.to_string().eq_ignore_ascii_case(wanted));
            match found {
                Some(client) => client.profile(),
                None => {
                    return CommandResult::bad_request(
                        COMMAND,
                        format!("no client with id `{wanted}` in the register"),
                    );
                }
            }
        }
        (None, Some(skin_type)) => SkinProfile::new(SkinType::parse_lenient(skin_type)),
        (None, None) => {
            return CommandResult::bad_request(
                COMMAND,
                "either --client or --skin-type is required",
            );
        }
    };
    profile.concern_tags.extend(args.concerns.iter().filter_map(|concern| normalize_tag(concern)));

    let scores = args.scores.scores();
    let plan = DeterministicRecommender.plan(
        &catalog,
        ConsultationInput { profile: &profile, budget: args.budget, scores: &scores },
    );
    let message = format!(
        "spent {} of {} on {} products; {} routine suggestions",
        plan.allocation.total_spent,
        plan.allocation.budget,
        plan.allocation.assigned().count(),
        plan.routine.suggestions.len()
    );

    CommandResult::success_with_data(COMMAND, message, plan)
}
