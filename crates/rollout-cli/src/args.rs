use std::ffi::OsString;

/// Accept Go-style single-dash long flags (`-commit abc`, `-image-name=demo`)
/// by rewriting them to `--commit`, `--image-name=demo`.
///
/// Single-letter short flags (`-h`, `-n`) and everything after a bare `--`
/// are left alone. The first element (program name) is never touched.
pub fn normalize<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;

    for (i, arg) in args.into_iter().enumerate() {
        if i == 0 || passthrough {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }
        out.push(match arg.to_str() {
            Some(s) if is_single_dash_long(s) => OsString::from(format!("-{s}")),
            _ => arg,
        });
    }

    out
}

fn is_single_dash_long(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    let name = match rest.split_once('=') {
        Some((name, _)) => name,
        None => rest,
    };
    !rest.starts_with('-') && name.len() > 1 && name.starts_with(|c: char| c.is_ascii_alphabetic())
}
