//! Stand-ins for the external environment creator and interpreter.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub(crate) const FAKE_VERSION: &str = "Python 3.11.4";
pub(crate) const MISSING_PYTHON: &str = "no-such-python";

pub(crate) fn write_executable(path: &Path, body: &str) {
    std::fs::write(path, body).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// A creator accepting `--python PY --prompt PROMPT TARGET`. It leaves a
/// half-built tree and fails when asked for [`MISSING_PYTHON`].
pub(crate) fn fake_creator(dir: &Path) -> PathBuf {
    let path = dir.join("fake-virtualenv");
    let body = format!(
        r#"#!/bin/sh
python="$2"
prompt="$4"
target="$5"
mkdir -p "$target/bin"
if [ "$python" = "{missing}" ]; then
    echo "The executable $python does not exist" >&2
    exit 1
fi
cat > "$target/bin/python" <<'PY'
#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "{version}"
    exit 0
fi
echo "$@" >> "$(dirname "$0")/../python-calls"
PY
chmod +x "$target/bin/python"
abs=$(cd "$target" && pwd)
cat > "$target/bin/activate" <<ACT
VIRTUAL_ENV='$abs'
PATH="\$VIRTUAL_ENV/bin:\$PATH"
export VIRTUAL_ENV PATH
ACT
printf '%s' "$prompt" > "$target/prompt"
"#,
        missing = MISSING_PYTHON,
        version = FAKE_VERSION,
    );
    write_executable(&path, &body);
    path
}

/// Lay out an environment whose interpreter reports `version` on stdout or,
/// like interpreters before 3.4, on stderr.
pub(crate) fn fake_env(path: &Path, version: &str, on_stderr: bool) {
    let bin = path.join("bin");
    std::fs::create_dir_all(&bin).unwrap();

    let redirect = if on_stderr { " >&2" } else { "" };
    write_executable(
        &bin.join("python"),
        &format!("#!/bin/sh\necho \"{}\"{}\n", version, redirect),
    );
    std::fs::write(
        bin.join("activate"),
        format!("VIRTUAL_ENV='{}'\nexport VIRTUAL_ENV\n", path.display()),
    )
    .unwrap();
}
