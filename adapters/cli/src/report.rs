//! Plain-text summaries of the board printed by the CLI.

use std::{fmt::Write as _, time::Duration};

use turf_war_core::{ActivityEntry, FactionId, TerritorySnapshot, TerritoryView};
use turf_war_system_standings::StandingsReport;

/// One line per territory: id, name, owner, control split and contested marker.
pub(crate) fn board(view: &TerritoryView) -> String {
    let mut out = String::new();
    for snapshot in view.iter() {
        let _ = writeln!(out, "{}", territory_line(snapshot));
    }
    out
}

fn territory_line(snapshot: &TerritorySnapshot) -> String {
    let owner = snapshot.owner.map_or("neutral", FactionId::name);
    let split = snapshot
        .control
        .iter()
        .map(|(faction, share)| format!("{}:{share:>5.1}%", faction.name()))
        .collect::<Vec<_>>()
        .join(" ");
    let marker = if snapshot.contested { " [contested]" } else { "" };
    format!(
        "{:>4} {:<22} {:<11} {split}{marker}",
        snapshot.id.to_string(),
        snapshot.name,
        owner
    )
}

/// Territory counts and shares per faction.
pub(crate) fn standings(report: &StandingsReport) -> String {
    let mut out = String::new();
    for (faction, holding) in report.factions() {
        let _ = writeln!(
            out,
            "{:<11} {:>2} territories ({:.1}%)",
            faction.name(),
            holding.count,
            holding.share
        );
    }
    let neutral = report.neutral();
    let _ = writeln!(
        out,
        "{:<11} {:>2} territories ({:.1}%)",
        "neutral", neutral.count, neutral.share
    );
    match report.frontrunner() {
        Some(faction) => {
            let _ = writeln!(out, "{faction} leads the city");
        }
        None => {
            let _ = writeln!(out, "no faction leads outright");
        }
    }
    out
}

/// Recent transitions, newest first.
pub(crate) fn activity(entries: &[ActivityEntry]) -> String {
    if entries.is_empty() {
        return String::from("no territory has changed hands\n");
    }
    let mut out = String::new();
    for entry in entries {
        let from = entry.from.map_or("neutral", FactionId::name);
        let _ = writeln!(
            out,
            "[{}] {} {} -> {}",
            clock(entry.at),
            entry.territory_name,
            from,
            entry.to
        );
    }
    out
}

fn clock(at: Duration) -> String {
    let total = at.as_secs();
    format!("{:02}:{:02}.{:01}", total / 60, total % 60, at.subsec_millis() / 100)
}
