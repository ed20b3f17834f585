//! Varco Panel Kernel
//!
//! Interactive console shell around the navigation and access-policy
//! kernel: sign in and out, navigate guarded panels, and walk history,
//! without the external panel renderer attached.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use varco_kernel::{
    AccessGate, Action, Actor, CatalogPolicy, Config, MenuEntry, MenuRegistry, NavError,
    PolicyService, Role, RouteParams, RoutePattern, Router, SessionHolder, SessionProvider,
    StaffPolicy, View, ViewHost,
};

/// Varco panel shell.
#[derive(Debug, Parser)]
#[command(name = "varco", about = "Interactive shell for the Varco panel kernel")]
struct Cli {
    /// Sign in at startup with this role (admin, manager, or staff).
    #[arg(long)]
    as_role: Option<Role>,

    /// Actor id used with --as-role.
    #[arg(long, default_value_t = 1)]
    actor_id: i64,

    /// Actor name used with --as-role.
    #[arg(long, default_value = "operator")]
    actor_name: String,

    /// Paths to open before the prompt.
    paths: Vec<String>,
}

/// View host that prints the committed view to stdout.
struct ConsoleHost;

impl ViewHost for ConsoleHost {
    fn replace(&self, view: View) {
        println!("== {} ({})", view.title, view.name);
        if !view.model.is_null() {
            println!("   {}", view.model);
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    info!(landing = %config.landing_path, "Starting Varco panel shell");

    let session = Arc::new(SessionHolder::new());
    if let Some(role) = cli.as_role {
        session.sign_in(Actor::new(cli.actor_id, cli.actor_name.clone(), role));
        info!(actor_id = cli.actor_id, %role, "Signed in from command line");
    }

    let mut gate = build_gate(&config, Arc::clone(&session))?;
    let menu = build_menu();

    if config.strict_permissions {
        let unguarded = gate.unguarded_paths();
        if !unguarded.is_empty() {
            bail!("STRICT_PERMISSIONS is set and these routes have no requirement: {unguarded:?}");
        }
    }

    for path in std::iter::once(config.landing_path.as_str())
        .chain(cli.paths.iter().map(String::as_str))
    {
        report(gate.navigate(path));
    }

    run_shell(&mut gate, &menu, &session)
}

/// Wire the demo route table and permission registry.
///
/// Requirement lookup is literal, so each concrete record path gets its
/// own requirement, expanded from the route template; the template string
/// itself is also bound so the coverage audit sees every registered
/// route.
fn build_gate(config: &Config, session: Arc<SessionHolder>) -> Result<AccessGate> {
    let host: Arc<dyn ViewHost> = Arc::new(ConsoleHost);
    let mut router = Router::new(host).with_history_limit(config.history_limit);

    router.register(
        "/dashboard",
        Arc::new(|_: &RouteParams| Ok(View::new("dashboard", "Dashboard"))),
    );
    router.register(
        "/staffs",
        Arc::new(|_: &RouteParams| Ok(View::new("staff_list", "Staff"))),
    );
    router.register_pattern(
        "/staffs/{id}",
        Arc::new(|params: &RouteParams| {
            Ok(View::new("staff_detail", "Staff record").with_model(serde_json::json!(params)))
        }),
    )?;
    router.register_pattern(
        "/staffs/edit/{id}",
        Arc::new(|params: &RouteParams| {
            Ok(View::new("staff_edit", "Edit staff").with_model(serde_json::json!(params)))
        }),
    )?;
    router.register(
        "/catalog",
        Arc::new(|_: &RouteParams| Ok(View::new("catalog_list", "Catalog"))),
    );
    router.register_pattern(
        "/catalog/{id}",
        Arc::new(|params: &RouteParams| {
            Ok(View::new("catalog_detail", "Catalog record").with_model(serde_json::json!(params)))
        }),
    )?;

    let policy = PolicyService::new(session as Arc<dyn SessionProvider>);
    let mut gate = AccessGate::new(router, policy);
    gate.register_policy(Arc::new(StaffPolicy::new()));
    gate.register_policy(Arc::new(CatalogPolicy::new()));

    // /dashboard stays public on purpose; everything else is guarded.
    gate.register_permission("/staffs", "staff", Action::Browse, "0")?;
    gate.register_permission("/catalog", "catalog", Action::Browse, "0")?;

    register_records(&mut gate, "/staffs/{id}", "staff", Action::Read, &[1, 2, 7])?;
    register_records(&mut gate, "/staffs/edit/{id}", "staff", Action::Edit, &[1, 2, 7])?;
    register_records(&mut gate, "/catalog/{id}", "catalog", Action::Read, &[10, 31])?;

    Ok(gate)
}

/// Bind a requirement on the template string and on each expanded record
/// path, with the record id as the default target.
fn register_records(
    gate: &mut AccessGate,
    template: &str,
    entity: &str,
    action: Action,
    ids: &[i64],
) -> Result<()> {
    gate.register_permission(template, entity, action, "0")?;

    let pattern = RoutePattern::compile(template)?;
    for id in ids {
        let mut params = RouteParams::new();
        params.insert("id".to_string(), id.to_string());
        let path = pattern.expand(&params)?;
        gate.register_permission(path, entity, action, id.to_string())?;
    }
    Ok(())
}

fn build_menu() -> MenuRegistry {
    let mut menu = MenuRegistry::new();
    menu.add(MenuEntry::new("/dashboard", "Dashboard").with_weight(-10));
    menu.add(MenuEntry::new("/staffs", "Staff"));
    menu.add(MenuEntry::new("/catalog", "Catalog").with_weight(10));
    menu
}

fn run_shell(
    gate: &mut AccessGate,
    menu: &MenuRegistry,
    session: &Arc<SessionHolder>,
) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("varco> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        let mut words = line.split_whitespace();

        match words.next() {
            None => {}
            Some("go") => match (words.next(), words.next()) {
                (Some(path), None) => report(gate.navigate(path)),
                (Some(path), Some(target)) => report(gate.navigate_with_target(path, target)),
                (None, _) => println!("usage: go <path> [target-id]"),
            },
            Some("back") => match gate.back() {
                Ok(Some(_)) => {}
                Ok(None) => println!("history is empty"),
                Err(err) => println!("error: {err}"),
            },
            Some("menu") => match menu.visible(gate) {
                Ok(entries) => {
                    for entry in entries {
                        println!("  {}  {}", entry.path, entry.title);
                    }
                }
                Err(err) => println!("error: {err}"),
            },
            Some("signin") => match parse_signin(words.collect::<Vec<_>>().as_slice()) {
                Ok(actor) => {
                    info!(actor_id = actor.id, role = %actor.role, "signed in");
                    session.sign_in(actor);
                }
                Err(err) => println!("{err}"),
            },
            Some("signout") => {
                session.sign_out();
                info!("signed out");
            }
            Some("whoami") => match session.current_actor() {
                Some(actor) => println!("{} (id {}, {})", actor.name, actor.id, actor.role),
                None => println!("not signed in"),
            },
            Some("quit") | Some("exit") => return Ok(()),
            Some(other) => {
                println!("unknown command '{other}'");
                println!("commands: go, back, menu, signin, signout, whoami, quit");
            }
        }
    }
}

fn parse_signin(args: &[&str]) -> Result<Actor> {
    let [id, name, role] = args else {
        bail!("usage: signin <id> <name> <admin|manager|staff>");
    };
    let id: i64 = id.parse().context("actor id must be an integer")?;
    let role: Role = role.parse()?;
    Ok(Actor::new(id, *name, role))
}

fn report(result: Result<View, NavError>) {
    match result {
        // The host already printed the view.
        Ok(_) => {}
        Err(err @ NavError::Denied(_)) => println!("access denied: {err}"),
        Err(err) => {
            warn!(error = %err, "navigation failed");
            println!("error: {err}");
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
