use anyhow::Result;
use colored::Colorize;
use nexus_application::AppServices;
use nexus_core::subscription::SubscriptionUsage;
use nexus_infrastructure::NexusPaths;

pub async fn show(paths: NexusPaths) -> Result<()> {
    let services = AppServices::load(paths)?;
    let usage = services.load_usage().await?;
    print_usage(&usage);
    Ok(())
}

pub fn print_usage(usage: &SubscriptionUsage) {
    println!("{} {}", "Tier:".bold(), usage.tier);
    let platform = format!(
        "{} / {} tokens ({} remaining)",
        usage.tokens_used,
        usage.token_limit,
        usage.remaining_platform_tokens()
    );
    if usage.is_over_limit() {
        println!("{} {}", "Platform:".bold(), platform.red());
    } else {
        println!("{} {}", "Platform:".bold(), platform);
    }
    println!("{} {} tokens", "Own keys:".bold(), usage.byok_tokens_used);
    println!(
        "{} {} / {}",
        "Workflows:".bold(),
        usage.workflows_used,
        usage.workflow_limit
    );
}
