//! Archive inspection command.

use std::fs;
use std::path::Path;

use addonbox::archive::{read_archive, Archive};

use crate::error::CliError;

/// Decode an archive file and print its header and file table.
pub fn run(file: &Path) -> Result<(), CliError> {
    let bytes = fs::read(file)?;
    let archive = read_archive(&bytes)?;
    print!("{}", render(&archive));
    Ok(())
}

fn render(archive: &Archive) -> String {
    let header = &archive.header;
    let mut out = String::new();

    out.push_str(&format!("Name:        {}\n", header.name));
    out.push_str(&format!("Type:        {}\n", header.description.package_type));
    out.push_str(&format!("Revision:    {}\n", header.revision));
    out.push_str(&format!(
        "Author:      {} ({})\n",
        header.author_name, header.author_id
    ));
    out.push_str(&format!("Timestamp:   {}\n", header.timestamp));
    out.push_str(&format!("Tags:        {}\n", header.description.tags.join(", ")));
    if !header.description.description.is_empty() {
        out.push_str(&format!("Description: {}\n", header.description.description));
    }
    out.push('\n');

    out.push_str(&format!(
        "{} file(s), {} bytes\n",
        archive.entries.len(),
        archive.total_size()
    ));
    for entry in &archive.entries {
        out.push_str(&format!("  {:>4}  {:>10}  {}\n", entry.index, entry.size, entry.path));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use addonbox::archive::encode_archive;
    use addonbox::package::{BlobKey, Content, Package, PackageType};
    use addonbox::store::MemoryStore;
    use tempfile::TempDir;

    #[test]
    fn test_render_lists_files() {
        let store = MemoryStore::new();
        store.insert_blob(BlobKey::new(1, 1), b"abcd".to_vec());
        let package = Package::new(3, 2, PackageType::Prop, "Crates")
            .with_content(vec![Content::new(1, 1, "models/crate.mdl", 4, 4)]);

        let archive = read_archive(&encode_archive(&package, &store).unwrap()).unwrap();
        let text = render(&archive);

        assert!(text.contains("Name:        Crates\n"));
        assert!(text.contains("Revision:    2\n"));
        assert!(text.contains("1 file(s), 4 bytes\n"));
        assert!(text.contains("models/crate.mdl"));
    }

    #[test]
    fn test_invalid_file_is_decode_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.gma");
        fs::write(&path, b"nope").unwrap();

        assert!(matches!(run(&path), Err(CliError::Decode(_))));
    }
}
