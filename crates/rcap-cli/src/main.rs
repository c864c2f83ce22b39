use anyhow::Result;
use clap::{Parser, Subcommand};
use rcap_application::AppContext;
use rcap_core::activity::{ActivityStatus, ActivityType};
use rcap_core::organisation::OrganisationType;
use rcap_core::user::Role;
use rcap_infrastructure::{ConfigService, RcapPaths};
use std::path::PathBuf;
use std::sync::Arc;

mod commands;
mod logging;
mod terminal;

use terminal::{TerminalNavigator, TerminalNotifier};

#[derive(Parser)]
#[command(name = "rcap")]
#[command(about = "RCAP CLI - report and review campaign activities from the terminal", long_about = None)]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Override the API base URL for this run
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Also write logs to a daily file under the config directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        organisation_id: Option<u64>,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Exchange the session token for a fresh one
    Refresh,
    Activities {
        #[command(subcommand)]
        action: ActivityAction,
    },
    Organisations {
        #[command(subcommand)]
        action: OrganisationAction,
    },
    Messages {
        #[command(subcommand)]
        action: MessageAction,
    },
    Notifications {
        #[command(subcommand)]
        action: NotificationAction,
    },
    Templates {
        #[command(subcommand)]
        action: TemplateAction,
    },
    Help {
        #[command(subcommand)]
        action: HelpAction,
    },
    /// Show the dashboard for your role
    Dashboard,
    Onboarding {
        #[command(subcommand)]
        action: OnboardingAction,
    },
    Analytics {
        #[command(subcommand)]
        action: AnalyticsAction,
    },
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    Route {
        #[command(subcommand)]
        action: RouteAction,
    },
}

impl Commands {
    /// Login and register run on the sign-in page.
    fn on_login_page(&self) -> bool {
        matches!(self, Commands::Login { .. } | Commands::Register { .. })
    }
}

#[derive(Subcommand)]
enum ActivityAction {
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        status: Option<ActivityStatus>,
        #[arg(long = "type")]
        activity_type: Option<ActivityType>,
        #[arg(long)]
        organisation_id: Option<u64>,
    },
    Show {
        id: u64,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long = "type")]
        activity_type: ActivityType,
        #[arg(long)]
        template_id: Option<u64>,
    },
    /// Submit a draft for approval
    Submit {
        id: u64,
    },
    Delete {
        id: u64,
    },
}

#[derive(Subcommand)]
enum OrganisationAction {
    List {
        #[arg(long)]
        parent_id: Option<u64>,
        #[arg(long = "type")]
        organisation_type: Option<OrganisationType>,
    },
    Show {
        id: u64,
    },
    /// List the members of an organisation
    Users {
        id: u64,
    },
}

#[derive(Subcommand)]
enum MessageAction {
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        unread: bool,
    },
    Show {
        id: u64,
    },
    Send {
        /// Recipient user id
        #[arg(long)]
        to: Option<u64>,
        /// Broadcast to an organisation
        #[arg(long)]
        organisation_id: Option<u64>,
        /// Broadcast to every user with this role
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body: String,
        #[arg(long)]
        urgent: bool,
    },
    Read {
        id: u64,
    },
    Reply {
        id: u64,
        #[arg(long)]
        body: String,
    },
}

#[derive(Subcommand)]
enum NotificationAction {
    List {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        unread: bool,
    },
    /// Print the unread count
    Unread,
    Read {
        id: u64,
    },
    ReadAll,
    /// Poll for new notifications until interrupted
    Watch,
}

#[derive(Subcommand)]
enum TemplateAction {
    List,
    Show { id: u64 },
}

#[derive(Subcommand)]
enum HelpAction {
    Search {
        query: String,
        #[arg(long)]
        category: Option<String>,
    },
    Show {
        id: u64,
    },
    Categories,
}

#[derive(Subcommand)]
enum OnboardingAction {
    Steps,
    Progress,
    Complete {
        step_id: u64,
        #[arg(long)]
        skip: bool,
    },
    Reset,
}

#[derive(Subcommand)]
enum AnalyticsAction {
    /// Activity counts per status
    Status {
        #[arg(long)]
        organisation_id: Option<u64>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    /// Activity counts per day
    Heatmap {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        organisation_id: Option<u64>,
        #[arg(long = "type")]
        activity_type: Option<String>,
    },
    Engagement {
        #[arg(long)]
        organisation_id: Option<u64>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    Trends {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,
    Update {
        #[arg(long)]
        name: Option<String>,
        /// Image file to upload as the profile picture
        #[arg(long)]
        picture: Option<PathBuf>,
    },
    /// Change your password (prompts for both values)
    Password,
}

#[derive(Subcommand)]
enum RouteAction {
    /// Show which route a path resolves to and whether you may open it
    Check { path: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = RcapPaths::new()?;
    paths.ensure_dirs()?;
    let mut config = ConfigService::from_paths(&paths).get_config()?;
    if let Some(api_url) = cli.api_url {
        config = config.with_api_url(api_url);
    }

    let logs_dir = paths.logs_dir();
    let _log_guard = logging::init(&config, cli.log_file.then_some(logs_dir.as_path()));

    let navigator = if cli.command.on_login_page() {
        TerminalNavigator::at_login(config.login_route.clone())
    } else {
        TerminalNavigator::new(config.login_route.clone())
    };
    let navigator = Arc::new(navigator);
    let ctx = AppContext::bootstrap(config, &paths, Arc::new(TerminalNotifier), navigator).await?;

    let result = run(&ctx, cli.command).await;
    ctx.stop();
    result
}

async fn run(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => commands::auth::login(ctx, email, password).await,
        Commands::Register {
            email,
            name,
            organisation_id,
        } => commands::auth::register(ctx, email, name, organisation_id).await,
        Commands::Logout => commands::auth::logout(ctx).await,
        Commands::Whoami => commands::auth::whoami(ctx).await,
        Commands::Refresh => commands::auth::refresh(ctx).await,
        Commands::Activities { action } => match action {
            ActivityAction::List {
                page,
                status,
                activity_type,
                organisation_id,
            } => {
                commands::activities::list(ctx, page, status, activity_type, organisation_id).await
            }
            ActivityAction::Show { id } => commands::activities::show(ctx, id).await,
            ActivityAction::Create {
                title,
                description,
                date,
                location,
                activity_type,
                template_id,
            } => {
                let draft = rcap_core::activity::NewActivity {
                    title,
                    description,
                    date,
                    location,
                    activity_type,
                    template_id,
                    tags: None,
                };
                commands::activities::create(ctx, draft).await
            }
            ActivityAction::Submit { id } => commands::activities::submit(ctx, id).await,
            ActivityAction::Delete { id } => commands::activities::delete(ctx, id).await,
        },
        Commands::Organisations { action } => match action {
            OrganisationAction::List {
                parent_id,
                organisation_type,
            } => commands::organisations::list(ctx, parent_id, organisation_type).await,
            OrganisationAction::Show { id } => commands::organisations::show(ctx, id).await,
            OrganisationAction::Users { id } => commands::organisations::users(ctx, id).await,
        },
        Commands::Messages { action } => match action {
            MessageAction::List { page, unread } => {
                commands::messages::list(ctx, page, unread).await
            }
            MessageAction::Show { id } => commands::messages::show(ctx, id).await,
            MessageAction::Send {
                to,
                organisation_id,
                role,
                subject,
                body,
                urgent,
            } => {
                let message = rcap_core::message::NewMessage {
                    recipient_id: to,
                    organisation_id,
                    role,
                    subject,
                    body,
                    is_urgent: urgent.then_some(true),
                    parent_message_id: None,
                };
                commands::messages::send(ctx, message).await
            }
            MessageAction::Read { id } => commands::messages::read(ctx, id).await,
            MessageAction::Reply { id, body } => commands::messages::reply(ctx, id, body).await,
        },
        Commands::Notifications { action } => match action {
            NotificationAction::List { limit, unread } => {
                commands::notifications::list(ctx, limit, unread).await
            }
            NotificationAction::Unread => commands::notifications::unread(ctx).await,
            NotificationAction::Read { id } => commands::notifications::read(ctx, id).await,
            NotificationAction::ReadAll => commands::notifications::read_all(ctx).await,
            NotificationAction::Watch => commands::notifications::watch(ctx).await,
        },
        Commands::Templates { action } => match action {
            TemplateAction::List => commands::templates::list(ctx).await,
            TemplateAction::Show { id } => commands::templates::show(ctx, id).await,
        },
        Commands::Help { action } => match action {
            HelpAction::Search { query, category } => {
                commands::help::search(ctx, query, category).await
            }
            HelpAction::Show { id } => commands::help::show(ctx, id).await,
            HelpAction::Categories => commands::help::categories(ctx).await,
        },
        Commands::Dashboard => commands::dashboard::show(ctx).await,
        Commands::Onboarding { action } => match action {
            OnboardingAction::Steps => commands::onboarding::steps(ctx).await,
            OnboardingAction::Progress => commands::onboarding::progress(ctx).await,
            OnboardingAction::Complete { step_id, skip } => {
                commands::onboarding::complete(ctx, step_id, skip).await
            }
            OnboardingAction::Reset => commands::onboarding::reset(ctx).await,
        },
        Commands::Analytics { action } => match action {
            AnalyticsAction::Status {
                organisation_id,
                from,
                to,
            } => commands::analytics::status(ctx, organisation_id, from, to).await,
            AnalyticsAction::Heatmap {
                from,
                to,
                organisation_id,
                activity_type,
            } => commands::analytics::heatmap(ctx, from, to, organisation_id, activity_type).await,
            AnalyticsAction::Engagement {
                organisation_id,
                from,
                to,
            } => commands::analytics::engagement(ctx, organisation_id, from, to).await,
            AnalyticsAction::Trends { from, to } => commands::analytics::trends(ctx, from, to).await,
        },
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(ctx).await,
            ProfileAction::Update { name, picture } => {
                commands::profile::update(ctx, name, picture).await
            }
            ProfileAction::Password => commands::profile::password(ctx).await,
        },
        Commands::Route { action } => match action {
            RouteAction::Check { path } => commands::route::check(ctx, &path).await,
        },
    }
}
