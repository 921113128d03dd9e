use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::SelectionResult;

const HEADER: [&str; 10] = [
    "identifier",
    "name",
    "quantity",
    "unit_price",
    "line_total",
    "sustainability_score",
    "co2_kg",
    "water_liters",
    "waste_kg",
    "energy_kwh",
];

/// Write one row per chosen line followed by a totals row.
pub fn write_selection<W: Write>(result: &SelectionResult, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;

    for line in &result.items {
        wtr.write_record([
            line.identifier.clone(),
            line.name.clone(),
            line.quantity.to_string(),
            format!("{:.2}", line.unit_price),
            format!("{:.2}", line.line_total),
            format!("{:.2}", line.sustainability_score),
            format!("{:.3}", line.impact.co2_kg),
            format!("{:.1}", line.impact.water_liters),
            format!("{:.3}", line.impact.waste_kg),
            format!("{:.2}", line.impact.energy_kwh),
        ])?;
    }

    wtr.write_record([
        "TOTAL".to_string(),
        String::new(),
        result.total_units.to_string(),
        String::new(),
        format!("{:.2}", result.total_cost),
        format!("{:.2}", result.average_sustainability),
        format!("{:.3}", result.impact.co2_kg),
        format!("{:.1}", result.impact.water_liters),
        format!("{:.3}", result.impact.waste_kg),
        format!("{:.2}", result.impact.energy_kwh),
    ])?;

    wtr.flush()?;
    Ok(())
}

/// Write the selection CSV to a file.
pub fn write_selection_csv(result: &SelectionResult, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_selection(result, file)
}
