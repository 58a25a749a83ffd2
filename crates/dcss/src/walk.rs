use camino::Utf8Path;
use camino::Utf8PathBuf;
use ignore::WalkBuilder;

/// Whether `path` looks like a stylesheet source.
pub fn is_stylesheet(path: &Utf8Path) -> bool {
    matches!(path.extension(), Some("dcss" | "css"))
}

/// Walk the given paths and collect files that pass `predicate`.
///
/// Files are taken as given (when they match); directories are walked
/// recursively, skipping hidden entries and anything `.gitignore`d.
/// Returns a sorted, deduplicated list.
#[must_use]
pub fn walk_files(
    paths: &[Utf8PathBuf],
    predicate: impl Fn(&Utf8Path) -> bool,
) -> Vec<Utf8PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if predicate(path) {
                files.push(path.clone());
            }
            continue;
        }

        if !path.is_dir() {
            tracing::warn!("Path does not exist: {}", path);
            continue;
        }

        let walker = WalkBuilder::new(path.as_std_path())
            .standard_filters(true)
            .build();

        for entry in walker.filter_map(Result::ok) {
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let Some(utf8) = Utf8Path::from_path(entry.path()) else {
                continue;
            };
            if predicate(utf8) {
                files.push(utf8.to_owned());
            }
        }
    }

    files.sort();
    files.dedup();
    files
}
