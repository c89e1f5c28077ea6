use std::path::Path;

use crate::config::{Config, ConfigFile, Context};

/// Overlay the non-empty fields of `top` onto `base`.
/// Empty fields in `top` leave `base` untouched.
pub fn overlay(mut base: Context, top: &Context) -> Context {
    if !top.root.is_empty() {
        base.root = top.root.clone();
    }
    if !top.user.is_empty() {
        base.user = top.user.clone();
    }
    if !top.password.is_empty() {
        base.password = top.password.clone();
    }
    base
}

/// Merge one loaded file into `config`.
///
/// Contexts are unioned by name; a name seen again is overlaid field by field.
/// `default-context` is kept from the first file that sets it.
pub fn merge_file(config: &mut Config, path: &Path, file: ConfigFile) {
    if config.default_context.is_none()
        && let Some(name) = file.default_context
    {
        config.default_context = Some(name);
        config.default_origin = Some(path.to_path_buf());
    }

    for named in file.contexts {
        match config.contexts.iter_mut().find(|c| c.name == named.name) {
            Some(existing) => {
                existing.context = overlay(std::mem::take(&mut existing.context), &named.context);
            }
            None => {
                config
                    .origins
                    .insert(named.name.clone(), path.to_path_buf());
                config.contexts.push(named);
            }
        }
    }

    config.files.push(path.to_path_buf());
}
