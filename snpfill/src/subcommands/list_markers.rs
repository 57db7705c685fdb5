use std::io::Write;
use std::path::PathBuf;

use color_eyre::Result;

use crate::hierarchy::Hierarchy;
use crate::io::{get_csv_reader, get_input, FileType};

/// Print the marker names of a genotype matrix csv or a hierarchy file,
/// one per line.
pub fn run(path: PathBuf) -> Result<()> {
    let markers = match FileType::from_path(&path)? {
        FileType::Tree => Hierarchy::from_file(&path)?.metadata.markers,
        _ => {
            let mut rdr = get_csv_reader(get_input(Some(path))?);
            rdr.headers()?.iter().skip(1).map(String::from).collect()
        }
    };

    let mut writer = std::io::stdout();
    for marker in markers {
        writeln!(writer, "{marker}")?;
    }

    Ok(())
}
