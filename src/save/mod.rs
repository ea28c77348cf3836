use crate::analysis::{Column, ColumnData, Ntuple};
use anyhow::{Context, Result};
use itertools::Itertools;

pub(crate) fn save_column(column: &Column, outdir: &str) -> Result<()> {
    match &column.data {
        ColumnData::I(values) => npy::to_file(
            format!("{}/{}.npy", outdir, column.name),
            values.iter().copied(),
        )
        .context(format!("Could not save {} data to file", column.name))?,
        ColumnData::D(values) => npy::to_file(
            format!("{}/{}.npy", outdir, column.name),
            values.iter().copied(),
        )
        .context(format!("Could not save {} data to file", column.name))?,
        ColumnData::S(values) => {
            let mut text = values.iter().join("\n");
            if !values.is_empty() {
                text.push('\n');
            }
            std::fs::write(format!("{}/{}.txt", outdir, column.name), text)
                .context(format!("Could not save {} data to file", column.name))?
        }
    }
    Ok(())
}

/// Writes `ntuple` under `<outdir>/<ntuple name>/`: one `.npy` file per
/// numeric column, one `.txt` file (a value per line) per text column and
/// a `schema.txt` listing the columns in order.
pub fn save_ntuple(ntuple: &Ntuple, outdir: &str) -> Result<()> {
    let output_prefix = format!("{}/{}", outdir, ntuple.name());
    std::fs::create_dir_all(&output_prefix).context("Unable to create output directory")?;

    for column in ntuple.columns() {
        save_column(column, &output_prefix)?;
    }

    let schema = ntuple
        .columns()
        .iter()
        .map(|c| {
            let kind = match c.data {
                ColumnData::I(_) => "I",
                ColumnData::D(_) => "D",
                ColumnData::S(_) => "S",
            };
            format!("{} {}", c.name, kind)
        })
        .join("\n");
    std::fs::write(format!("{}/schema.txt", output_prefix), schema + "\n")
        .context("Could not save the ntuple schema")?;

    Ok(())
}
