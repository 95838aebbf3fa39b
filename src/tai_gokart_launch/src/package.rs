//! Package share directory lookup

use crate::error::{ResolveError, Result};
use std::{
    collections::HashMap,
    env,
    ffi::OsStr,
    path::{Path, PathBuf},
};

/// Relative location of the ament package marker files inside a prefix
const PACKAGE_MARKER_DIR: &str = "share/ament_index/resource_index/packages";

const DEFAULT_OPT_ROOT: &str = "/opt/ros";

/// Distributions probed under `/opt/ros` when `ROS_DISTRO` gives no hit
const KNOWN_DISTROS: &[&str] = &["jazzy", "iron", "humble", "galactic", "foxy"];

/// Resolves the installed share directory of a package
pub trait PackageLocator: Send + Sync {
    fn resolve_share_directory(&self, package: &str) -> Result<PathBuf>;
}

impl<T: PackageLocator + ?Sized> PackageLocator for &T {
    fn resolve_share_directory(&self, package: &str) -> Result<PathBuf> {
        (**self).resolve_share_directory(package)
    }
}

impl<T: PackageLocator + ?Sized> PackageLocator for std::sync::Arc<T> {
    fn resolve_share_directory(&self, package: &str) -> Result<PathBuf> {
        (**self).resolve_share_directory(package)
    }
}

impl<T: PackageLocator + ?Sized> PackageLocator for Box<T> {
    fn resolve_share_directory(&self, package: &str) -> Result<PathBuf> {
        (**self).resolve_share_directory(package)
    }
}

/// Locator searching ament install prefixes
#[derive(Debug, Clone, Default)]
pub struct AmentIndexLocator {
    prefixes: Vec<PathBuf>,
    distro: Option<String>,
    /// Root holding `<distro>` install trees; `None` disables the fallback
    opt_root: Option<PathBuf>,
}

impl AmentIndexLocator {
    /// Search only the given prefixes, in order
    pub fn with_prefixes<I, P>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            distro: None,
            opt_root: None,
        }
    }

    /// Prefixes from `AMENT_PREFIX_PATH`, falling back to `/opt/ros/<distro>`
    pub fn from_env() -> Self {
        let prefix_path = env::var_os("AMENT_PREFIX_PATH");
        let distro = env::var("ROS_DISTRO").ok();
        Self::from_env_values(prefix_path.as_deref(), distro.as_deref())
    }

    fn from_env_values(prefix_path: Option<&OsStr>, distro: Option<&str>) -> Self {
        let prefixes = prefix_path
            .map(|paths| {
                env::split_paths(paths)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            prefixes,
            distro: distro.filter(|d| !d.is_empty()).map(str::to_string),
            opt_root: Some(PathBuf::from(DEFAULT_OPT_ROOT)),
        }
    }

    /// Search `<root>/<distro>` after the explicit prefixes
    pub fn with_opt_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.opt_root = Some(root.into());
        self
    }

    pub fn with_distro(mut self, distro: impl Into<String>) -> Self {
        self.distro = Some(distro.into()).filter(|d| !d.is_empty());
        self
    }

    pub fn prefixes(&self) -> &[PathBuf] {
        &self.prefixes
    }

    /// Install roots in search order
    fn search_roots(&self) -> Vec<PathBuf> {
        let mut roots = self.prefixes.clone();

        if let Some(opt_root) = &self.opt_root {
            let distros = self
                .distro
                .iter()
                .map(String::as_str)
                .chain(KNOWN_DISTROS.iter().copied());
            for distro in distros {
                let root = opt_root.join(distro);
                if !roots.contains(&root) {
                    roots.push(root);
                }
            }
        }

        roots
    }

    fn find_in_prefix(prefix: &Path, package: &str) -> Option<PathBuf> {
        let share_dir = prefix.join("share").join(package);

        if prefix.join(PACKAGE_MARKER_DIR).join(package).is_file() {
            return Some(share_dir);
        }

        // Packages installed without a resource index entry
        if share_dir.is_dir() {
            return Some(share_dir);
        }

        None
    }
}

impl PackageLocator for AmentIndexLocator {
    fn resolve_share_directory(&self, package: &str) -> Result<PathBuf> {
        if package.is_empty() {
            return Err(ResolveError::PackageNotFound(package.to_string()));
        }

        let roots = self.search_roots();
        for prefix in &roots {
            log::debug!("Looking for package {} in {}", package, prefix.display());
            if let Some(share_dir) = Self::find_in_prefix(prefix, package) {
                log::debug!("Found package {} at {}", package, share_dir.display());
                return Ok(share_dir);
            }
        }

        log::debug!("Package {} not found in {} prefixes", package, roots.len());
        Err(ResolveError::PackageNotFound(package.to_string()))
    }
}

/// Locator backed by an explicit package table
#[derive(Debug, Clone, Default)]
pub struct FixedLocator {
    packages: HashMap<String, PathBuf>,
}

impl FixedLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(
        mut self,
        package: impl Into<String>,
        share_dir: impl Into<PathBuf>,
    ) -> Self {
        self.insert(package, share_dir);
        self
    }

    pub fn insert(&mut self, package: impl Into<String>, share_dir: impl Into<PathBuf>) {
        self.packages.insert(package.into(), share_dir.into());
    }
}

impl PackageLocator for FixedLocator {
    fn resolve_share_directory(&self, package: &str) -> Result<PathBuf> {
        self.packages
            .get(package)
            .cloned()
            .ok_or_else(|| ResolveError::PackageNotFound(package.to_string()))
    }
}

/// Install prefix owning a package share directory (`<prefix>/share/<pkg>`)
pub fn install_prefix(share_dir: &Path) -> Option<&Path> {
    share_dir.parent().and_then(Path::parent)
}

/// Default location of a package executable (`<prefix>/lib/<pkg>/<exec>`)
pub fn executable_path(share_dir: &Path, package: &str, executable: &str) -> Option<PathBuf> {
    install_prefix(share_dir).map(|prefix| prefix.join("lib").join(package).join(executable))
}
