//! Plain-text and CSV rendering of results and pots

use crate::lottery::pot::{day_label, WEEK};
use crate::lottery::{GameVariant, PotConfiguration, PrizeResult, ResultSummary, Symbol};
use chrono::{NaiveDate, Weekday};

const CSV_HEADER: &str = "ID,Nombre,Números,Aciertos,Gratis,Premio";

/// `resultados_<variant>_<YYYY-MM-DD>.csv`
pub fn csv_file_name(variant: GameVariant, date: NaiveDate) -> String {
    format!("resultados_{}_{}.csv", variant, date.format("%Y-%m-%d"))
}

fn join_numbers(numbers: &[Symbol], separator: &str) -> String {
    numbers
        .iter()
        .map(|symbol| symbol.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}

fn prize_label(amount: i64) -> String {
    if amount > 0 {
        format!("{} BS", amount)
    } else {
        "-".to_string()
    }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// CSV export of `rows`, followed by the winning numbers
pub fn render_csv(rows: &[&PrizeResult], summary: &ResultSummary) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for result in rows {
        let ticket = &result.ticket;
        let line = [
            ticket.id().to_string(),
            quote(ticket.player_name()),
            quote(&join_numbers(&ticket.numbers(), "-")),
            result.hits.to_string(),
            if ticket.is_free() { "SÍ" } else { "NO" }.to_string(),
            quote(&prize_label(result.prize_amount)),
        ]
        .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }

    csv.push_str("\n\nNúmeros Ganadores\n");
    csv.push_str(&join_numbers(&summary.winning_numbers, ","));
    csv.push('\n');
    csv
}

/// Ranked results as a fixed-width table
pub fn render_table(rows: &[&PrizeResult]) -> String {
    let name_width = rows
        .iter()
        .map(|result| result.ticket.player_name().chars().count())
        .max()
        .unwrap_or(0)
        .max("Nombre".len());

    let mut table = format!(
        "{:>4}  {:>4}  {:<name_width$}  {:<20}  {:>8}  {:>6}  {:>10}\n",
        "Pos", "ID", "Nombre", "Números", "Aciertos", "Gratis", "Premio"
    );
    for result in rows {
        let ticket = &result.ticket;
        table.push_str(&format!(
            "{:>4}  {:>4}  {:<name_width$}  {:<20}  {:>8}  {:>6}  {:>10}\n",
            result.rank,
            ticket.id(),
            ticket.player_name(),
            join_numbers(&ticket.numbers(), "-"),
            result.hits,
            if ticket.is_free() { "SÍ" } else { "NO" },
            prize_label(result.prize_amount),
        ));
    }
    table
}

pub fn render_summary(summary: &ResultSummary) -> String {
    let winning = if summary.winning_numbers.is_empty() {
        "(sin sorteo)".to_string()
    } else {
        join_numbers(&summary.winning_numbers, " ")
    };

    let lines = [
        format!("{} - resultados", summary.variant.title()),
        format!("Números ganadores:   {}", winning),
        format!(
            "Jugadas:             {} ({} pagadas, {} gratis)",
            summary.total_tickets, summary.paid_tickets, summary.free_tickets
        ),
        format!(
            "Recaudado:           {} BS a {} BS por jugada",
            summary.total_collected, summary.ticket_price
        ),
        format!("Para premios:        {:.0} BS", summary.allocated_share),
        format!("Pote semanal:        {} BS", summary.weekly_total),
        format!("Acumulado:           {} BS", summary.accumulated),
        format!("Garantizado:         {} BS", summary.guaranteed_minimum),
        format!("Pote total:          {:.0} BS", summary.total_pool),
        format!(
            "Ganadores ({} aciertos): {}",
            summary.variant.pick_size(),
            summary.winners
        ),
        format!("Premio por ganador:  {} BS", summary.prize_per_winner),
    ];
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Daily contributions with `today` marked
pub fn render_pot(variant: GameVariant, pot: &PotConfiguration, today: Weekday) -> String {
    let mut out = format!("{} - pote\n", variant.title());
    for day in WEEK {
        let marker = if day == today { "*" } else { " " };
        out.push_str(&format!(
            "{} {:<10} {:>8}\n",
            marker,
            day_label(day),
            pot.daily_contribution(day)
        ));
    }
    out.push_str(&format!("  {:<10} {:>8}\n", "semana", pot.weekly_total()));
    out.push_str(&format!("  {:<10} {:>8}\n", "acumulado", pot.accumulated()));
    out.push_str(&format!("  {:<10} {:>8}\n", "garantizado", pot.guaranteed_minimum()));
    out.push_str(&format!("  {:<10} {:>8}\n", "jugada", pot.ticket_price()));
    out
}
