use std::sync::Arc;

use clap::{Parser, Subcommand};
use reqwest::header::{COOKIE, HeaderValue};
use serde::Serialize;
use tutorat::config::{ClientConfig, ConfigError};
use tutorat::i18n::{Catalog, I18nConfig, I18nError, Locale, Translator};
use tutorat::net::api;
use tutorat::net::error::{ApiError, TransportError};
use tutorat::net::http::{ApiClient, HttpRequest, HttpResponse, ReqwestTransport, Transport};
use tutorat::net::types::{CampaignDashboard, TutorMatch, TutorSubjectDetail};
use tutorat::state::session::SessionStore;
use tutorat::ui::{Navigator, Notifier, Toast, ToastKind};

/// Name of the backend's session cookie.
const SESSION_COOKIE: &str = "insa_tutorat_session";

const FR_CATALOG: &str = include_str!("../../locales/fr.json");
const EN_CATALOG: &str = include_str!("../../locales/en.json");

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("locale catalog error: {0}")]
    Catalog(#[from] I18nError),
    #[error("invalid session cookie value")]
    InvalidSession,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "tutorat", about = "Tutoring platform API client")]
struct Cli {
    /// Backend origin; falls back to `BASE_URL` then `http://localhost:8080`.
    #[arg(long)]
    base_url: Option<String>,

    /// Value of the backend session cookie.
    #[arg(long, env = "TUTORAT_SESSION")]
    session: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the authenticated user.
    Whoami,
    /// End the current session.
    Logout,
    /// Mail a login link.
    SendLink { mail: String },
    /// Open a session from a mailed login token.
    Login { token: String },
    /// List a campaign's subjects.
    Subjects { campaign_id: u64 },
    /// Print the current user's availability grid for a campaign.
    Availabilities { campaign_id: u64 },
    /// List all campaigns (admin).
    Campaigns,
    /// Print the current user's tutee and tutor assignments.
    Assignments,
}

// =============================================================================
// UI SEAMS
// =============================================================================

struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str) {
        tracing::info!(%path, "redirect");
    }
}

struct TerminalNotifier {
    translator: Translator,
}

impl Notifier for TerminalNotifier {
    fn notify(&self, toast: Toast) {
        eprintln!("[{}] {}", toast_label(&self.translator, toast.kind), toast.message);
    }
}

fn toast_label(translator: &Translator, kind: ToastKind) -> &str {
    translator.t(match kind {
        ToastKind::Success => "toast.success",
        ToastKind::Info => "toast.info",
        ToastKind::Warning => "toast.warning",
        ToastKind::Error => "toast.error",
    })
}

/// Translator for `locale` built from the catalogs compiled into the binary.
fn translator(locale: Locale) -> Result<Translator, I18nError> {
    let config = I18nConfig::default();
    let locale = config.resolve(Some(locale));
    let catalog = |locale: Locale| {
        let json = match locale {
            Locale::Fr => FR_CATALOG,
            Locale::En => EN_CATALOG,
        };
        Catalog::from_json_str(locale, json)
    };
    let fallback = if locale == config.default_locale { None } else { Some(catalog(config.default_locale)?) };
    Ok(Translator::new(catalog(locale)?, fallback))
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// Attaches a pre-existing session cookie to every request.
struct SessionCookieTransport {
    inner: ReqwestTransport,
    cookie: Option<HeaderValue>,
}

#[async_trait::async_trait]
impl Transport for SessionCookieTransport {
    async fn execute(&self, mut request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if let Some(cookie) = &self.cookie {
            request.headers.insert(COOKIE, cookie.clone());
        }
        self.inner.execute(request).await
    }
}

fn session_cookie(session: Option<&str>) -> Result<Option<HeaderValue>, CliError> {
    session
        .map(|value| HeaderValue::from_str(&format!("{SESSION_COOKIE}={value}")).map_err(|_| CliError::InvalidSession))
        .transpose()
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let (config, translator) = match setup(cli.base_url.as_deref()) {
        Ok(setup) => setup,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            eprintln!("[error] {e}");
            std::process::exit(1);
        }
    };
    let notifier = Arc::new(TerminalNotifier { translator: translator.clone() });

    if let Err(e) = run(cli.command, cli.session.as_deref(), &config, &translator, notifier.clone()).await {
        tracing::error!(error = %e, "command failed");
        notifier.notify(Toast::error(e.to_string()));
        std::process::exit(1);
    }
}

fn setup(base_url: Option<&str>) -> Result<(ClientConfig, Translator), CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = base_url {
        config = config.with_base_url(base_url)?;
    }
    let translator = translator(config.locale)?;
    Ok((config, translator))
}

async fn run(
    command: Command,
    session: Option<&str>,
    config: &ClientConfig,
    translator: &Translator,
    notifier: Arc<TerminalNotifier>,
) -> Result<(), CliError> {
    let transport = SessionCookieTransport { inner: ReqwestTransport::new()?, cookie: session_cookie(session)? };
    let client = ApiClient::new(config.base_url.clone(), Arc::new(transport));

    match command {
        Command::Whoami => {
            let store = SessionStore::new(client, Arc::new(TerminalNavigator), notifier);
            store.fetch_user().await;
            let user = store.user().ok_or(CliError::NotAuthenticated)?;
            print_json(&user)
        }
        Command::Logout => {
            let store = SessionStore::new(client, Arc::new(TerminalNavigator), notifier);
            store.logout().await?;
            Ok(())
        }
        Command::SendLink { mail } => {
            api::send_login_link(&client, &mail).await?;
            println!("{} {mail}", translator.t("auth.linkSent"));
            Ok(())
        }
        Command::Login { token } => {
            api::login_with_token(&client, &token).await?;
            println!("{}", translator.t("auth.loginSuccess"));
            Ok(())
        }
        Command::Subjects { campaign_id } => print_json(&api::campaign_subjects(&client, campaign_id).await?),
        Command::Availabilities { campaign_id } => print_json(&api::availabilities(&client, campaign_id).await?),
        Command::Campaigns => print_json(&api::admin_campaigns(&client).await?),
        Command::Assignments => {
            let tutee = api::tutee_assignments(&client).await?;
            let tutor = api::tutor_assignments(&client).await?;
            print_json(&AssignmentsView { tutee: &tutee, tutor: &tutor })
        }
    }
}

#[derive(Serialize)]
struct AssignmentsView<'a> {
    tutee: &'a [CampaignDashboard<TutorMatch>],
    tutor: &'a [CampaignDashboard<TutorSubjectDetail>],
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
