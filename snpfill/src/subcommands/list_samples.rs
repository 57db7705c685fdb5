use std::io::Write;
use std::path::PathBuf;

use color_eyre::Result;

use crate::io::{get_csv_reader, get_input};

/// Print the sample names of a genotype matrix csv, one per line.
pub fn run(path: PathBuf) -> Result<()> {
    let mut rdr = get_csv_reader(get_input(Some(path))?);
    rdr.headers()?;

    let mut writer = std::io::stdout();
    for line in rdr.records() {
        let record = line?;
        if let Some(sample) = record.get(0) {
            writeln!(writer, "{sample}")?;
        }
    }

    Ok(())
}
