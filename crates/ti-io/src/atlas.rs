//! Atlas label loader for `RoiSpec::SurfaceLabel`/`RoiSpec::Volume`
//! resolution, sharing the `TILF` container reader.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ti_core::{TiError, TiResult};

use crate::container::Container;

/// Per-element tissue tags read from an atlas file's `/tags` section.
/// `ti_core::roi::resolve` takes already-resolved tags directly, so this
/// loader's only job is getting those integers off disk.
pub fn load_atlas_tags(path: &Path) -> TiResult<Vec<i32>> {
    let file = File::open(path)
        .map_err(|e| TiError::NotFound(format!("cannot open atlas '{}': {e}", path.display())))?;
    let container = Container::read(BufReader::new(file))?;
    container.get("/tags")?.as_i32()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::i32_section;
    use std::io::Cursor;

    #[test]
    fn reads_tags_section() {
        let mut container = Container::new();
        container.insert(i32_section("/tags", vec![3], &[2, 1002, 1]));
        let mut buf = Vec::new();
        container.write(&mut buf).unwrap();
        let parsed = Container::read(Cursor::new(buf)).unwrap();
        assert_eq!(parsed.get("/tags").unwrap().as_i32().unwrap(), vec![2, 1002, 1]);
    }
}
