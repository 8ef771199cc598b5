//! Refs command handler

use super::read_input;
use crate::cli::RefsArgs;
use crate::error::Result;
use crate::output::OutputWriter;
use specref_core::{ParseOptions, SpecLoader};
use tracing::instrument;

/// Handle the refs command
///
/// Lists references without following them, so nothing beyond the input
/// file is read.
#[instrument(skip(output), fields(file = %args.file.display()))]
pub fn handle_refs(args: RefsArgs, output: &mut OutputWriter) -> Result<()> {
    let data = read_input(&args.file)?;
    let loader = SpecLoader::new();
    let (document, format) = loader.parse(&data, &ParseOptions::for_file(args.file.clone()))?;
    tracing::debug!(format = ?format, "Parsed document");

    output.references(&loader.references(&document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::output::tests::test_writer;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_refs_lists_without_resolving() {
        let dir = tempdir().unwrap();
        let spec = dir.path().join("spec.yaml");
        // neither target exists; listing must still succeed
        fs::write(
            &spec,
            "a:\n  $ref: './missing.yaml#/A'\nb:\n  $ref: '#/nowhere'\n",
        )
        .unwrap();

        let (mut output, out, _) = test_writer(OutputFormat::Json);
        handle_refs(RefsArgs { file: spec }, &mut output).unwrap();

        assert_eq!(out.contents(), "[\"#/nowhere\",\"./missing.yaml#/A\"]\n");
    }
}
