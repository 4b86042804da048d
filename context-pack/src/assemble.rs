//! Context package assembly (whole-file mode).
//!
//! 1) Walk local imports from the entry file (pre-order, capped).
//! 2) Load and prune the behavior descriptor, if one is given or discoverable.
//! 3) Load the shared-state files it names, skipping any already gathered by
//!    the walk; these share the `max_files` cap with the walked files.

use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::behavior::BehaviorLinker;
use crate::config::model::ContextConfig;
use crate::core::normalize::canonical_or_same;
use crate::core::prune::Pruner;
use crate::core::resolve::ModuleResolver;
use crate::core::traits::{ImportResolver, SizeEstimator, WhitespaceEstimator};
use crate::graph::{ImportWalker, Traversal};
use crate::model::package::{AssembleOptions, ContextPackage, FileMap};

/// Composes resolver, pruner and linker into one bounded result.
///
/// Holds no per-call state, so one assembler may serve concurrent calls.
#[derive(Debug, Clone)]
pub struct Assembler<R = ModuleResolver, E = WhitespaceEstimator> {
    resolver: R,
    pruner: Pruner<E>,
    linker: BehaviorLinker,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::from_config(&ContextConfig::default())
    }
}

impl Assembler {
    pub fn from_config(cfg: &ContextConfig) -> Self {
        Self::new(
            ModuleResolver::from_config(&cfg.resolve),
            WhitespaceEstimator,
            BehaviorLinker::from_config(&cfg.behavior),
        )
    }
}

impl<R: ImportResolver, E: SizeEstimator> Assembler<R, E> {
    pub fn new(resolver: R, estimator: E, linker: BehaviorLinker) -> Self {
        Self {
            resolver,
            pruner: Pruner::new(estimator),
            linker,
        }
    }

    /// Build the context package for `entry_file`.
    ///
    /// `behavior_file` overrides descriptor discovery. Never fails; unreadable
    /// inputs only make the package smaller.
    #[tracing::instrument(level = "debug", skip_all, fields(entry = %entry_file.display()))]
    pub fn assemble(
        &self,
        entry_file: &Path,
        behavior_file: Option<&Path>,
        opts: &AssembleOptions,
    ) -> ContextPackage {
        let entry = canonical_or_same(entry_file);
        let mut package = ContextPackage::new(entry.clone());
        let mut traversal = Traversal::new(opts.max_files);

        let walker = ImportWalker::new(&self.resolver, &self.pruner, opts.max_tokens_per_file);
        walker.walk(&entry, &mut traversal, &mut package.files);
        debug!(
            files = package.files.len(),
            visited = traversal.visited_count(),
            "assemble: walk done"
        );

        if opts.include_behavior {
            self.attach_behavior(&mut package, behavior_file, opts);
        }

        info!(
            files = package.files.len(),
            state_files = package.state_files.as_ref().map_or(0, |s| s.len()),
            behavior = package.behavior_file.is_some(),
            "assemble: package ready"
        );
        package
    }

    fn attach_behavior(
        &self,
        package: &mut ContextPackage,
        behavior_file: Option<&Path>,
        opts: &AssembleOptions,
    ) {
        let descriptor = match behavior_file {
            Some(p) => Some(p.to_path_buf()),
            None => self.linker.find_behavior_descriptor(&package.entry_file),
        };
        let Some(descriptor) = descriptor else {
            debug!("assemble: no behavior descriptor");
            return;
        };
        let raw = match fs::read_to_string(&descriptor) {
            Ok(s) => s,
            Err(err) => {
                debug!(path = %descriptor.display(), error = %err, "assemble: descriptor unreadable");
                return;
            }
        };
        package.behavior_file = Some(self.pruner.prune(&raw, opts.max_tokens_per_file));

        let dir = descriptor.parent().unwrap_or(Path::new("."));
        let mut state_files = FileMap::new();
        for path in self.linker.resolve_state_references(&raw, dir) {
            if package.files.len() + state_files.len() >= opts.max_files {
                debug!("assemble: file cap reached before all state files");
                break;
            }
            if package.contains(&path) || state_files.contains_key(&path) {
                debug!(path = %path.display(), "assemble: state file already gathered");
                continue;
            }
            match fs::read_to_string(&path) {
                Ok(text) => {
                    let pruned = self.pruner.prune(&text, opts.max_tokens_per_file);
                    state_files.insert(path, pruned);
                }
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "assemble: state file unreadable");
                }
            }
        }
        package.state_files = Some(state_files);
    }
}

/// [`Assembler::assemble`] with default resolution and behavior settings.
pub fn assemble(
    entry_file: &Path,
    behavior_file: Option<&Path>,
    opts: &AssembleOptions,
) -> ContextPackage {
    Assembler::default().assemble(entry_file, behavior_file, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, body: &str) -> PathBuf {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(&p, body).unwrap();
        dunce::canonicalize(&p).unwrap()
    }

    struct Fixture {
        _tmp: TempDir,
        login: PathBuf,
        button: PathBuf,
        use_auth: PathBuf,
        auth_state: PathBuf,
        theme: PathBuf,
    }

    /// LoginForm -> Button, useAuth; useAuth -> state/authState.
    /// The descriptor names authState (already reached) and theme.
    fn login_fixture() -> Fixture {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let login = write(
            root,
            "LoginForm.jsx",
            r#"import React, { useState } from "react";
import Button from "./Button";
import useAuth from "./useAuth";

// Renders the login form.
export default function LoginForm() {
  const [email, setEmail] = useState("");
  const { login } = useAuth();
  return <Button onClick={() => login(email)}>Log In</Button>;
}
"#,
        );
        let button = write(
            root,
            "Button.jsx",
            "export default function Button(props) {\n  return <button {...props} />;\n}\n",
        );
        let use_auth = write(
            root,
            "useAuth.js",
            r#"import { useContext } from "react";
import { authState } from "./state/authState";

export default function useAuth() {
  const login = (email) => {
    console.log("Logging in", email); /* call the API here */
  };
  return { login };
}
"#,
        );
        let auth_state = write(root, "state/authState.js", "export const authState = { user: null };\n");
        let theme = write(root, "state/theme.js", "export const theme = 'dark';\n");
        write(
            root,
            "LoginForm.zap.toml",
            "name = \"LoginForm\"\nbehavior = \"Lets a user log in\"\nuses = [\"authState\", \"theme\"]\n",
        );
        Fixture {
            _tmp: tmp,
            login,
            button,
            use_auth,
            auth_state,
            theme,
        }
    }

    fn opts(max_files: usize) -> AssembleOptions {
        AssembleOptions {
            max_files,
            max_tokens_per_file: 1000,
            include_behavior: true,
        }
    }

    #[test]
    fn login_form_gathers_imports_behavior_and_state() {
        let fx = login_fixture();
        let pkg = assemble(&fx.login, None, &opts(5));

        assert_eq!(pkg.entry_file, fx.login);
        let keys: Vec<PathBuf> = pkg.files.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                fx.login.clone(),
                fx.button.clone(),
                fx.use_auth.clone(),
                fx.auth_state.clone()
            ]
        );
        assert!(pkg.behavior_file.as_deref().unwrap().contains("LoginForm"));

        let state = pkg.state_files.as_ref().unwrap();
        assert!(!state.contains_key(&fx.auth_state), "no duplicate authState");
        assert!(state.contains_key(&fx.theme));
        assert_eq!(pkg.gathered_count(), 5);
    }

    #[test]
    fn comments_are_stripped_from_gathered_files() {
        let fx = login_fixture();
        let pkg = assemble(&fx.login, None, &opts(5));
        assert!(!pkg.files[&fx.login].contains("Renders the login form"));
        assert!(!pkg.files[&fx.use_auth].contains("call the API"));
    }

    #[test]
    fn cap_is_shared_with_state_files() {
        let fx = login_fixture();
        let pkg = assemble(&fx.login, None, &opts(4));
        assert_eq!(pkg.files.len(), 4);
        assert!(pkg.state_files.as_ref().unwrap().is_empty());

        let pkg = assemble(&fx.login, None, &opts(2));
        let keys: Vec<PathBuf> = pkg.files.keys().cloned().collect();
        assert_eq!(keys, vec![fx.login.clone(), fx.button.clone()]);
    }

    #[test]
    fn behavior_can_be_disabled_or_given_explicitly() {
        let fx = login_fixture();
        let mut o = opts(5);
        o.include_behavior = false;
        let pkg = assemble(&fx.login, None, &o);
        assert!(pkg.behavior_file.is_none());
        assert!(pkg.state_files.is_none());

        let other = fx.login.parent().unwrap().join("custom.toml");
        fs::write(&other, "uses = [\"theme\"]\n").unwrap();
        let pkg = assemble(&fx.login, Some(&other), &opts(5));
        assert!(pkg.behavior_file.as_deref().unwrap().contains("theme"));
        assert!(pkg.state_files.as_ref().unwrap().contains_key(&fx.theme));
    }

    #[test]
    fn token_budget_applies_to_every_file() {
        let fx = login_fixture();
        let o = AssembleOptions {
            max_files: 5,
            max_tokens_per_file: 6,
            include_behavior: true,
        };
        let pkg = assemble(&fx.login, None, &o);
        let est = WhitespaceEstimator;
        assert!(pkg.files.values().all(|t| est.estimate_size(t) <= 6));
        assert!(est.estimate_size(pkg.behavior_file.as_deref().unwrap()) <= 6);
        // Import discovery reads raw text, so truncation loses no dependencies.
        assert_eq!(pkg.files.len(), 4);
    }

    #[test]
    fn unreadable_entry_yields_empty_package() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("Nope.jsx");
        let pkg = assemble(&missing, None, &opts(5));
        assert!(pkg.files.is_empty());
        assert!(pkg.behavior_file.is_none());
    }

    #[test]
    fn repeated_assembly_is_deterministic() {
        let fx = login_fixture();
        let a = assemble(&fx.login, None, &opts(5));
        let b = assemble(&fx.login, None, &opts(5));
        let ka: Vec<&PathBuf> = a.files.keys().collect();
        let kb: Vec<&PathBuf> = b.files.keys().collect();
        assert_eq!(ka, kb);
        assert_eq!(a, b);
    }
}
