//! Catalog listing and custom template commands.

use crate::app::api::{self, AddTemplateOptions};
use crate::domain::{AppError, StudioHome};

pub fn run_scenarios(home: &StudioHome) -> Result<(), AppError> {
    let scenarios = api::list_scenarios_at(home)?;
    println!("📚 Scenarios:");
    for scenario in scenarios {
        println!(
            "  {:<10} {} ({} photo(s)) {}",
            scenario.id, scenario.name, scenario.photos, scenario.description
        );
    }
    Ok(())
}

pub fn run_templates(home: &StudioHome, scenario: &str) -> Result<(), AppError> {
    let (scenario, templates) = api::list_templates_at(home, scenario)?;
    println!("🎨 {}s for {} ({}):", scenario.layout.item_label(), scenario.name, scenario.id);
    for template in templates {
        let marker = if template.is_custom() { " [custom]" } else { "" };
        match &template.category {
            Some(category) => {
                println!("  {:<16} {} ({}){}", template.id, template.name, category, marker)
            }
            None => println!("  {:<16} {}{}", template.id, template.name, marker),
        }
    }
    Ok(())
}

pub fn run_backgrounds(home: &StudioHome, scenario: &str) -> Result<(), AppError> {
    let (scenario, backgrounds) = api::list_backgrounds_at(home, scenario)?;
    if backgrounds.is_empty() {
        println!("No background presets for {} ({})", scenario.name, scenario.id);
        return Ok(());
    }
    println!("🏞️  Backgrounds for {} ({}):", scenario.name, scenario.id);
    for background in backgrounds {
        println!("  {:<16} {}: {}", background.id, background.name, background.prompt);
    }
    Ok(())
}

pub fn run_add_template(home: &StudioHome, options: &AddTemplateOptions) -> Result<(), AppError> {
    let outcome = api::add_template_at(home, options)?;
    println!(
        "✅ Added template '{}' ({}) to {}",
        outcome.template.name, outcome.template.id, outcome.scenario_id
    );
    Ok(())
}
