//! SpaceVoice CLI
//!
//! Operator command-line interface for the SpaceVoice platform:
//! - Sign in, register, redeem access codes
//! - Manage phone numbers and place calls
//! - Inspect revenue and income analytics
//! - Configure and generate widget embeds
//! - Run the pricing and ROI calculators offline
//! - Inspect domain routing and route-guard decisions

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use spacevoice::client::{
    ApiClient, CallRequest, ClientError, EmbedSettingsUpdate, NewPhoneNumber, NumberSearch,
    PageQuery, PhoneNumberUpdate, PurchaseRequest, RegisterRequest,
};
use spacevoice::config::{generate_default_config, Config};
use spacevoice::embed::{EmbedKind, EmbedOptions, EmbedPosition, EmbedTheme};
use spacevoice::pricing::{self, UsageInput, DEFAULT_COST_PER_MINUTE, HUMAN_AGENT_HOURLY_RATE};
use spacevoice::session::{redirect_for, FileTokenStore, SessionPhase, SessionStore, TokenStore};

#[derive(Parser)]
#[command(name = "spacevoice")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator CLI for the SpaceVoice voice-agent platform")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend API URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Config file (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with email and password
    Login {
        email: String,
        /// Password (prompted on stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        email: String,
        username: String,
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the stored token
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Sign in with a shared access code
    Redeem { code: String },

    /// Manage phone numbers
    Numbers {
        #[command(subcommand)]
        action: NumberCommand,
    },

    /// Place and end calls
    Call {
        #[command(subcommand)]
        action: CallCommand,
    },

    /// Customer revenue analytics
    Revenue {
        #[command(subcommand)]
        action: AnalyticsCommand,
    },

    /// Internal income analytics
    Income {
        #[command(subcommand)]
        action: AnalyticsCommand,
    },

    /// Widget embed settings and snippets
    Embed {
        #[command(subcommand)]
        action: EmbedCommand,
    },

    /// Estimate monthly cost for a usage profile
    Pricing {
        #[arg(long)]
        calls: u64,
        /// Average call duration in minutes
        #[arg(long)]
        minutes: f64,
        /// Cost per minute
        #[arg(long, default_value_t = DEFAULT_COST_PER_MINUTE)]
        rate: f64,
    },

    /// Compare cost against human agents
    Roi {
        #[arg(long)]
        calls: u64,
        #[arg(long)]
        minutes: f64,
        #[arg(long, default_value_t = DEFAULT_COST_PER_MINUTE)]
        rate: f64,
        /// Hourly cost of a human agent
        #[arg(long, default_value_t = HUMAN_AGENT_HOURLY_RATE)]
        hourly: f64,
    },

    /// Show how the edge server routes a host and path
    Route { host: String, path: String },

    /// Show where the route guard sends a session viewing a path
    Redirect {
        path: String,
        /// Evaluate for this phase instead of the stored session
        #[arg(long, value_enum)]
        phase: Option<PhaseArg>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum NumberCommand {
    /// List the account's numbers
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
    /// Show one number
    Get { id: i64 },
    /// Register a number the account already owns
    Add {
        number: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        agent: Option<String>,
    },
    /// Rename a number or reassign its agent
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        agent: Option<String>,
    },
    Delete { id: i64 },
    /// Search numbers available for purchase
    Search {
        #[arg(long, default_value = "US")]
        country: String,
        #[arg(long)]
        area_code: Option<String>,
        #[arg(long)]
        contains: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    Purchase {
        number: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        agent: Option<String>,
    },
    /// Release a purchased number back to the carrier
    Release { id: i64 },
}

#[derive(Subcommand)]
pub enum CallCommand {
    /// Start an outbound call
    Start {
        /// Id of the calling phone number
        #[arg(long)]
        from: i64,
        /// Destination number
        #[arg(long)]
        to: String,
        #[arg(long)]
        agent: Option<String>,
    },
    Hangup { call_id: String },
}

#[derive(Subcommand)]
pub enum AnalyticsCommand {
    Summary,
    History {
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Populate demo data
    Seed,
}

#[derive(Subcommand)]
pub enum EmbedCommand {
    /// Show an agent's embed settings
    Get { agent: String },
    /// Change an agent's embed settings
    Set {
        agent: String,
        #[arg(long)]
        enabled: Option<bool>,
        #[arg(long)]
        position: Option<EmbedPosition>,
        #[arg(long)]
        theme: Option<EmbedTheme>,
        #[arg(long)]
        greeting: Option<String>,
        /// Allowed host domains (repeatable, replaces the list)
        #[arg(long = "allow")]
        allowed_domains: Vec<String>,
    },
    /// Print a copy-paste snippet
    Snippet {
        agent: String,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        theme: Option<String>,
        #[arg(long, default_value = "script")]
        kind: EmbedKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PhaseArg {
    Unauthenticated,
    Loading,
    Onboarding,
    Complete,
}

impl From<PhaseArg> for SessionPhase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Unauthenticated => SessionPhase::Unauthenticated,
            PhaseArg::Loading => SessionPhase::Loading,
            PhaseArg::Onboarding => SessionPhase::AuthenticatedOnboarding,
            PhaseArg::Complete => SessionPhase::AuthenticatedComplete,
        }
    }
}

/// Client and session wired to the persisted token
struct Remote {
    client: ApiClient,
    session: SessionStore,
    widget_url: String,
}

impl Remote {
    fn open(config: &Config) -> Result<Self> {
        let tokens: Arc<dyn TokenStore> = Arc::new(
            FileTokenStore::open(&config.storage.session_file)
                .with_context(|| format!("opening session file {}", config.storage.session_file))?,
        );
        let client = ApiClient::new(config.api.client_config(), Arc::clone(&tokens))?;
        let session = SessionStore::new(Arc::new(client.clone()), tokens);
        Ok(Self {
            client,
            session,
            widget_url: config.site.widget_url.clone(),
        })
    }

    /// Restore the stored session; fail unless it resolves to a signed-in user
    async fn require_login(&self) -> Result<()> {
        let phase = self.session.init().await.phase();
        if !phase.is_authenticated() {
            bail!("Not logged in. Run `spacevoice login` first.");
        }
        Ok(())
    }

    async fn require_writable(&self) -> Result<()> {
        self.require_login().await?;
        if self.session.is_read_only() {
            bail!("This session was opened with a read-only access code");
        }
        Ok(())
    }

    /// Route a failed call through the session; auth failures log out
    async fn check<T>(&self, result: Result<T, ClientError>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                if self.session.handle_error(&e).await {
                    bail!("Session expired. Run `spacevoice login` again.");
                }
                Err(e.into())
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    config.logging.init();

    let format = cli.format;

    match cli.command {
        Commands::Pricing {
            calls,
            minutes,
            rate,
        } => {
            let input = usage(calls, minutes, rate);
            let est = pricing::estimate(&input)?;
            emit(format, &est, || {
                println!("Monthly minutes:   {:.0}", est.monthly_minutes);
                println!("Monthly cost:      ${:.2}", est.monthly_cost);
                println!("Annual cost:       ${:.2}", est.annual_cost);
                println!("Cost per call:     ${:.2}", est.cost_per_call);
                println!(
                    "Best plan:         {} (${:.2}/month)",
                    est.recommended_tier, est.recommended_tier_cost
                );
            })?;
        }

        Commands::Roi {
            calls,
            minutes,
            rate,
            hourly,
        } => {
            let r = pricing::roi(&usage(calls, minutes, rate), hourly)?;
            emit(format, &r, || {
                println!("Voice agent:       ${:.2}/month", r.ai_monthly_cost);
                println!("Human agents:      ${:.2}/month", r.human_monthly_cost);
                println!(
                    "Savings:           ${:.2}/month (${:.2}/year, {:.1}%)",
                    r.monthly_savings, r.annual_savings, r.savings_percent
                );
            })?;
        }

        Commands::Route { host, path } => {
            let decision = config.site.host_rules().route(&host, &path);
            match decision.location() {
                Some(location) => println!("307 -> {}", location),
                None => println!("serve as-is"),
            }
        }

        Commands::Redirect {
            path,
            phase: Some(phase),
        } => print_redirect(phase.into(), redirect_for(phase.into(), &path)),

        Commands::Redirect { path, phase: None } => {
            let ctx = Remote::open(&config)?;
            let phase = ctx.session.init().await.phase();
            print_redirect(phase, ctx.session.redirect_for(&path).await);
            ctx.session.teardown().await;
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }

        command => {
            let ctx = Remote::open(&config)?;
            run_remote(&ctx, command, format).await?;
            ctx.session.teardown().await;
        }
    }

    Ok(())
}

/// Commands that talk to the backend
async fn run_remote(ctx: &Remote, command: Commands, format: OutputFormat) -> Result<()> {
    let client = &ctx.client;

    match command {
        Commands::Login { email, password } => {
            let password = password_or_prompt(password)?;
            let session = ctx.session.login(&email, &password).await?;
            report_session(session.user.as_ref().map(|u| u.username.as_str()), session.phase());
        }

        Commands::Register {
            email,
            username,
            password,
        } => {
            let password = password_or_prompt(password)?;
            let user = client
                .register(&RegisterRequest {
                    email,
                    username,
                    password,
                })
                .await?;
            println!("Account created for {}. Run `spacevoice login` to sign in.", user.email);
        }

        Commands::Logout => {
            ctx.session.logout().await;
            println!("Logged out");
        }

        Commands::Whoami => {
            let session = ctx.session.init().await;
            match &session.user {
                Some(user) => emit(format, user, || {
                    println!("{} <{}>", user.username, user.email);
                    println!("Status: {}", session.phase());
                    if ctx.session.is_read_only() {
                        println!("Access: read-only");
                    }
                })?,
                None => println!("Not logged in"),
            }
        }

        Commands::Redeem { code } => {
            let redeemed = client.redeem_access_token(&code).await?;
            let session = ctx
                .session
                .adopt_token(&redeemed.access_token, redeemed.read_only)
                .await?;
            report_session(session.user.as_ref().map(|u| u.username.as_str()), session.phase());
            if redeemed.read_only {
                println!("Access is read-only");
            }
        }

        Commands::Numbers { action } => numbers(ctx, action, format).await?,

        Commands::Call { action } => {
            ctx.require_writable().await?;
            let record = match action {
                CallCommand::Start { from, to, agent } => {
                    let call = CallRequest {
                        phone_number_id: from,
                        to_number: to,
                        agent_id: agent,
                    };
                    ctx.check(client.initiate_call(&call).await).await?
                }
                CallCommand::Hangup { call_id } => {
                    ctx.check(client.hangup_call(&call_id).await).await?
                }
            };
            emit(format, &record, || {
                println!("Call {}: {}", record.call_id, record.status)
            })?;
        }

        Commands::Revenue { action } => match action {
            AnalyticsCommand::Summary => {
                ctx.require_login().await?;
                let s = ctx.check(client.revenue_summary().await).await?;
                emit(format, &s, || {
                    println!("Total revenue:     {:.2} {}", s.total_revenue, s.currency);
                    println!(
                        "MRR:               {:.2} {}",
                        s.monthly_recurring_revenue, s.currency
                    );
                    println!("Subscriptions:     {}", s.active_subscriptions);
                })?;
            }
            AnalyticsCommand::History { days } => {
                ctx.require_login().await?;
                let points = ctx.check(client.revenue_history(days).await).await?;
                emit(format, &points, || {
                    println!("{:<12} {:>12}", "Date", "Revenue");
                    for p in &points {
                        println!("{:<12} {:>12.2}", p.date, p.revenue);
                    }
                })?;
            }
            AnalyticsCommand::Seed => {
                ctx.require_writable().await?;
                let r = ctx.check(client.seed_revenue().await).await?;
                emit(format, &r, || print_seed(r.created, r.message.as_deref()))?;
            }
        },

        Commands::Income { action } => match action {
            AnalyticsCommand::Summary => {
                ctx.require_login().await?;
                let s = ctx.check(client.income_summary().await).await?;
                emit(format, &s, || {
                    println!("Total income:      {:.2} {}", s.total_income, s.currency);
                    println!("This month:        {:.2}", s.this_month);
                    println!("Last month:        {:.2}", s.last_month);
                    if let Some(g) = s.growth_percent {
                        println!("Growth:            {:+.1}%", g);
                    }
                })?;
            }
            AnalyticsCommand::History { days } => {
                ctx.require_login().await?;
                let points = ctx.check(client.income_history(days).await).await?;
                emit(format, &points, || {
                    println!("{:<12} {:>12}", "Date", "Amount");
                    for p in &points {
                        println!("{:<12} {:>12.2}", p.date, p.amount);
                    }
                })?;
            }
            AnalyticsCommand::Seed => {
                ctx.require_writable().await?;
                let r = ctx.check(client.seed_income().await).await?;
                emit(format, &r, || print_seed(r.created, r.message.as_deref()))?;
            }
        },

        Commands::Embed { action } => {
            let settings = match action {
                EmbedCommand::Get { agent } => {
                    ctx.require_login().await?;
                    ctx.check(client.embed_settings(&agent).await).await?
                }
                EmbedCommand::Set {
                    agent,
                    enabled,
                    position,
                    theme,
                    greeting,
                    allowed_domains,
                } => {
                    ctx.require_writable().await?;
                    let update = EmbedSettingsUpdate {
                        enabled,
                        position,
                        theme,
                        greeting,
                        allowed_domains: (!allowed_domains.is_empty()).then_some(allowed_domains),
                    };
                    ctx.check(client.update_embed_settings(&agent, &update).await)
                        .await?
                }
                EmbedCommand::Snippet {
                    agent,
                    position,
                    theme,
                    kind,
                } => {
                    let options =
                        EmbedOptions::parse(&agent, position.as_deref(), theme.as_deref())?;
                    println!("{}", options.snippet(kind, &ctx.widget_url));
                    return Ok(());
                }
            };
            emit(format, &settings, || {
                println!("Agent:     {}", settings.agent_id);
                println!("Enabled:   {}", settings.enabled);
                println!("Position:  {}", settings.position);
                println!("Theme:     {}", settings.theme);
                if !settings.allowed_domains.is_empty() {
                    println!("Domains:   {}", settings.allowed_domains.join(", "));
                }
                if let Some(g) = &settings.greeting {
                    println!("Greeting:  {}", g);
                }
            })?;
        }

        Commands::Pricing { .. }
        | Commands::Roi { .. }
        | Commands::Route { .. }
        | Commands::Redirect { .. }
        | Commands::Config { .. } => bail!("command runs without the backend"),
    }

    Ok(())
}

async fn numbers(ctx: &Remote, action: NumberCommand, format: OutputFormat) -> Result<()> {
    let client = &ctx.client;

    match action {
        NumberCommand::List { page, page_size } => {
            ctx.require_login().await?;
            let page = ctx
                .check(client.list_phone_numbers(PageQuery { page, page_size }).await)
                .await?;
            emit(format, &page, || {
                println!("{:<8} {:<16} {:<20} {:<10} Agent", "ID", "Number", "Name", "Status");
                for n in &page.items {
                    println!(
                        "{:<8} {:<16} {:<20} {:<10} {}",
                        n.id,
                        n.phone_number,
                        n.friendly_name.as_deref().unwrap_or("-"),
                        n.status.as_deref().unwrap_or("-"),
                        n.agent_id.as_deref().unwrap_or("-"),
                    );
                }
                println!("\nPage {}/{} ({} total)", page.page, page.total_pages, page.total);
            })?;
        }

        NumberCommand::Get { id } => {
            ctx.require_login().await?;
            let n = ctx.check(client.get_phone_number(id).await).await?;
            emit(format, &n, || print_number(&n))?;
        }

        NumberCommand::Add {
            number,
            name,
            provider,
            agent,
        } => {
            ctx.require_writable().await?;
            let new = NewPhoneNumber {
                phone_number: number,
                friendly_name: name,
                provider,
                agent_id: agent,
            };
            let n = ctx.check(client.create_phone_number(&new).await).await?;
            emit(format, &n, || print_number(&n))?;
        }

        NumberCommand::Update { id, name, agent } => {
            ctx.require_writable().await?;
            let update = PhoneNumberUpdate {
                friendly_name: name,
                agent_id: agent,
            };
            let n = ctx.check(client.update_phone_number(id, &update).await).await?;
            emit(format, &n, || print_number(&n))?;
        }

        NumberCommand::Delete { id } => {
            ctx.require_writable().await?;
            ctx.check(client.delete_phone_number(id).await).await?;
            println!("Deleted phone number {}", id);
        }

        NumberCommand::Search {
            country,
            area_code,
            contains,
            limit,
        } => {
            ctx.require_login().await?;
            let search = NumberSearch {
                country,
                area_code,
                contains,
                limit,
            };
            let found = ctx.check(client.search_available_numbers(&search).await).await?;
            emit(format, &found, || {
                println!("{:<16} {:<20} {:>10}", "Number", "Locality", "Monthly");
                for n in &found {
                    let cost = n
                        .monthly_cost
                        .map(|c| format!("${:.2}", c))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<16} {:<20} {:>10}",
                        n.phone_number,
                        n.locality.as_deref().unwrap_or("-"),
                        cost
                    );
                }
            })?;
        }

        NumberCommand::Purchase {
            number,
            name,
            agent,
        } => {
            ctx.require_writable().await?;
            let request = PurchaseRequest {
                phone_number: number,
                friendly_name: name,
                agent_id: agent,
            };
            let n = ctx.check(client.purchase_phone_number(&request).await).await?;
            emit(format, &n, || print_number(&n))?;
        }

        NumberCommand::Release { id } => {
            ctx.require_writable().await?;
            let n = ctx.check(client.release_phone_number(id).await).await?;
            emit(format, &n, || print_number(&n))?;
        }
    }

    Ok(())
}

fn usage(calls: u64, minutes: f64, rate: f64) -> UsageInput {
    UsageInput {
        calls_per_month: calls,
        avg_duration_minutes: minutes,
        cost_per_minute: rate,
    }
}

/// Print `value` as JSON, or run `table` for the human format
fn emit<T: Serialize>(format: OutputFormat, value: &T, table: impl FnOnce()) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Table => table(),
    }
    Ok(())
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    if let Some(p) = password {
        return Ok(p);
    }
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("A password is required");
    }
    Ok(password)
}

fn report_session(username: Option<&str>, phase: SessionPhase) {
    match (username, phase) {
        (Some(name), SessionPhase::AuthenticatedOnboarding) => {
            println!("Logged in as {}. Onboarding is not finished yet.", name)
        }
        (Some(name), _) => println!("Logged in as {}", name),
        (None, _) => println!("Signed in, but the profile could not be loaded"),
    }
}

fn print_redirect(phase: SessionPhase, target: Option<&str>) {
    match target {
        Some(route) => println!("{}: redirect to {}", phase, route),
        None => println!("{}: stay", phase),
    }
}

fn print_number(n: &spacevoice::client::PhoneNumber) {
    println!("ID:        {}", n.id);
    println!("Number:    {}", n.phone_number);
    if let Some(name) = &n.friendly_name {
        println!("Name:      {}", name);
    }
    if let Some(status) = &n.status {
        println!("Status:    {}", status);
    }
    if let Some(agent) = &n.agent_id {
        println!("Agent:     {}", agent);
    }
}

fn print_seed(created: u64, message: Option<&str>) {
    match message {
        Some(m) => println!("{} ({} records)", m, created),
        None => println!("Seeded {} records", created),
    }
}
