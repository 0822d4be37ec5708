//! CLI entry-point that prints the stored files.

use anyhow::Result;
use tracing::instrument;

use crate::{
    config::Settings,
    data::{self, queries},
};

const PREVIEW_CHARS: usize = 60;

#[instrument(skip(settings))]
pub async fn run(settings: Settings) -> Result<()> {
    let conn = data::initialize(&settings.database_path)?;
    let records = queries::get_all_entries(&conn)?;
    println!("{} file(s) in {}", records.len(), settings.database_path.display());
    for record in records {
        println!(
            "{:>6}  {}  {}",
            record.id,
            record.file_name,
            preview(&record.contents)
        );
    }
    Ok(())
}

fn preview(contents: &str) -> String {
    let flat = contents.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::preview;

    #[test]
    fn preview_flattens_and_truncates() {
        assert_eq!(preview("a\n b"), "a b");
        let long = "x".repeat(80);
        assert_eq!(preview(&long).chars().count(), 63);
    }
}
