use std::path::Path;

use path_absolutize::Absolutize;

/// Extensions of the files picked up when walking directories.
pub const CPP_EXTENSIONS: &[&str] = &[
    "c", "cc", "cpp", "cxx", "c++", "h", "hh", "hpp", "hxx", "h++", "ipp", "inl",
];

pub fn has_cpp_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CPP_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)))
}

/// Express `path` relative to the current directory when it lives under it,
/// for display.
pub fn relativize_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    let Ok(absolute) = path.absolutize() else {
        return path.to_string_lossy().to_string();
    };
    let Ok(cwd) = std::env::current_dir() else {
        return absolute.to_string_lossy().to_string();
    };

    match absolute.strip_prefix(&cwd) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.to_string_lossy().to_string(),
        _ => absolute.to_string_lossy().to_string(),
    }
}
