use std::path::Path;

use colored::Colorize;

use super::{load_spawn_file, populate, world_for};

pub fn run(spawns: &Path) -> Result<(), String> {
    let file = load_spawn_file(spawns)?;
    let population: usize = file.spawns.iter().map(|s| s.count).sum();

    let mut sim = world_for(population, 0);
    populate(&mut sim, &file);

    println!(
        "  {} {}",
        "Zone occupancy".bold(),
        format!("({population} npcs from {})", spawns.display()).dimmed()
    );
    println!();
    super::run::print_zone_table(&sim);
    Ok(())
}
