use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use fw_core::coord::Coord;
use fw_core::entity::Npc;
use fw_sim::Lifecycle;

use crate::wander::WanderStage;

use super::{SpawnFile, load_spawn_file, populate, world_for};

/// Tallies of the lifecycle notifications observed during a run.
#[derive(Debug, Default)]
struct EventTally {
    spawns: usize,
    deletes: usize,
}

pub fn run(
    spawns: Option<&Path>,
    npcs: usize,
    ticks: u64,
    seed: u64,
    verbose: bool,
) -> Result<(), String> {
    let file = match spawns {
        Some(path) => load_spawn_file(path)?,
        None => synthetic_population(npcs),
    };
    let population: usize = file.spawns.iter().map(|s| s.count).sum();

    let mut sim = world_for(population, seed);
    sim.add_npc_stage(WanderStage::new(4));

    let tally = Rc::new(RefCell::new(EventTally::default()));
    let on_spawn = Rc::clone(&tally);
    sim.npcs_mut()
        .events_mut()
        .subscribe(Lifecycle::Spawn, move |_: &Npc| {
            on_spawn.borrow_mut().spawns += 1;
        });
    let on_delete = Rc::clone(&tally);
    sim.npcs_mut()
        .events_mut()
        .subscribe(Lifecycle::Delete, move |_: &Npc| {
            on_delete.borrow_mut().deletes += 1;
        });

    populate(&mut sim, &file);

    if verbose {
        for _ in 0..ticks {
            sim.tick();
            println!(
                "  {} {} npcs indexed",
                format!("[tick {:>4}]", sim.current_cycle()).dimmed(),
                sim.npcs().count()
            );
        }
    } else {
        sim.run(ticks);
    }

    let tally = tally.borrow();
    println!(
        "  {} {}",
        "Fenwold run".bold(),
        format!("({ticks} ticks, seed={seed})").dimmed()
    );
    println!(
        "  {} npcs live, {} spawned, {} retired, {} tiles blocked",
        sim.npcs().len(),
        tally.spawns,
        tally.deletes,
        sim.collision().blocked_tiles()
    );
    println!();
    print_zone_table(&sim);
    Ok(())
}

/// A default population of wanderers scattered along a diagonal.
fn synthetic_population(npcs: usize) -> SpawnFile {
    let spawns = (0..npcs)
        .map(|i| super::NpcSpawn {
            name: format!("wanderer-{i}"),
            type_id: 1,
            coords: Coord::new(64 + (i as i32 % 8) * 8, 64 + (i as i32 / 8) * 8, 0),
            count: 1,
            content_group: 0,
        })
        .collect();
    SpawnFile { spawns }
}

/// Print the populated zones and their occupancy, busiest first.
pub(super) fn print_zone_table(sim: &fw_sim::Simulation) {
    let mut rows: Vec<(String, usize)> = sim
        .npcs()
        .zones()
        .iter()
        .filter(|(_, bucket)| !bucket.is_empty())
        .map(|(key, bucket)| (key.to_string(), bucket.len()))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Zone", "Npcs"]);
    for (zone, count) in &rows {
        table.add_row(vec![zone.clone(), count.to_string()]);
    }
    println!("{table}");
    println!();
    println!("  {} populated zones", rows.len());
}
