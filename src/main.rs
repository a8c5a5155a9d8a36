use clap::Parser;
use tracing_subscriber::EnvFilter;

use stockpulse::application::usecases::{HandleClassificationUseCase, RunOnceUseCase};
use stockpulse::application::{CooldownStore, CycleOutcome, NotificationGate, Notifier, StockProvider};
use stockpulse::domain::{CallToAction, CooldownPolicy, DatacenterStatus, format_remaining};
use stockpulse::infrastructure::{
    console_notifier::ConsoleNotifier, fake_provider::FakeStockProvider,
    memory_store::InMemoryCooldownStore, ovh_provider::OvhStockProvider,
    sqlite_store::open_cooldown_store,
    telegram_notifier::TelegramNotifier,
};
use stockpulse::interfaces::config::Config;

#[derive(Parser, Debug)]
#[command(name = "stockpulse")]
struct Args {
    /// Optional YAML config file; environment variables override it
    #[arg(long)]
    config: Option<String>,

    /// Override the cooldown state file location
    #[arg(long)]
    state_file: Option<String>,

    /// Print the notification instead of sending it; cooldown state is not written
    #[arg(long)]
    dry_run: bool,

    /// Skip the stock API and pretend the target region reports this status
    #[arg(long)]
    fake_status: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // .env first so RUST_LOG from it reaches the filter
    let _ = dotenvy::dotenv();
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "stockpulse=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    // 1) load config
    let mut cfg = match Config::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("configuration error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(path) = &args.state_file {
        cfg.state_file = path.into();
    }

    // 2) build infra
    let provider: Box<dyn StockProvider> = match &args.fake_status {
        Some(status) => {
            tracing::warn!(status = %status, "--fake-status enabled: stock API not queried");
            Box::new(FakeStockProvider::new(vec![DatacenterStatus::new(
                cfg.target.region(),
                status,
            )]))
        }
        None => match OvhStockProvider::new(&cfg.ovh_api_base, cfg.http_timeout) {
            Ok(p) => Box::new(p),
            Err(e) => {
                tracing::error!("failed to build stock client: {e}");
                std::process::exit(1);
            }
        },
    };

    let persistent = open_cooldown_store(
        cfg.database_url.as_deref(),
        &cfg.target.scope_key(),
        &cfg.state_file,
    )
    .await;

    // dry runs see the real cooldown but never change it
    let store: Box<dyn CooldownStore> = if args.dry_run {
        tracing::warn!("--dry-run enabled: console output only");
        let last = persistent.read().await.unwrap_or_else(|e| {
            tracing::warn!("failed to read cooldown state, assuming none: {e}");
            None
        });
        Box::new(InMemoryCooldownStore::with_last_notified(last))
    } else {
        persistent
    };

    let notifier: Option<Box<dyn Notifier>> = if args.dry_run {
        Some(Box::new(ConsoleNotifier::new()))
    } else if let Some(creds) = &cfg.telegram {
        match TelegramNotifier::new(
            &cfg.telegram_api_base,
            &creds.bot_token,
            &creds.chat_id,
            cfg.http_timeout,
        ) {
            Ok(n) => Some(Box::new(n)),
            Err(e) => {
                tracing::error!("failed to build telegram client: {e}");
                None
            }
        }
    } else {
        tracing::warn!("TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID not set, notifications disabled");
        None
    };

    // 3) usecases
    let handle_classification = HandleClassificationUseCase {
        target: &cfg.target,
        gate: NotificationGate {
            store: store.as_ref(),
            policy: CooldownPolicy::from_seconds(cfg.cooldown_seconds),
        },
        notifier: notifier.as_deref(),
        templates: &cfg.templates,
        call_to_action: Some(CallToAction::resolve(
            cfg.button_text.as_deref(),
            cfg.button_url.as_deref(),
        )),
    };
    let run_once = RunOnceUseCase {
        target: &cfg.target,
        provider: provider.as_ref(),
        handle_classification,
    };

    // 4) run
    match run_once.execute().await {
        Ok(CycleOutcome::CoolingDown { remaining, .. }) => {
            tracing::info!("check completed, cooldown {} remaining", format_remaining(remaining));
        }
        Ok(outcome) => tracing::info!(?outcome, "check completed"),
        Err(e) => {
            tracing::error!("stock check failed: {e}");
            std::process::exit(1);
        }
    }
}
