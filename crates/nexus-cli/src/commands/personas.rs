use anyhow::Result;
use colored::Colorize;
use nexus_application::AppServices;
use nexus_infrastructure::NexusPaths;

pub fn list(paths: NexusPaths) -> Result<()> {
    let services = AppServices::load(paths)?;
    for persona in services.catalog.iter() {
        println!(
            "{} {} {}",
            persona.icon,
            persona.name.bold(),
            format!("({})", persona.slug).bright_black()
        );
        println!("   {}", persona.description);
        if !persona.use_cases.is_empty() {
            println!("   {}", persona.use_cases.join(" · ").bright_black());
        }
    }
    Ok(())
}
