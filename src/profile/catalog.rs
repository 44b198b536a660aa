// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Declarative catalog of required configuration.
//!
//! A __catalog__ is an ordered listing of __sections__. Each section names a
//! heading comment, and one or more __entries__ that must be present in a
//! managed file. The order of sections decides where wholly missing sections
//! end up when appended, nothing more.
//!
//! Profiles manage two files through catalogs: the activation
//! script (`.envrc`), and the ignore-list (`.gitignore`). Both built-in
//! catalogs are process-wide constants initialized once on first access, and
//! are only reachable through the read-only accessors [`envrc_catalog`] and
//! [`gitignore_catalog`]. The merge engine never reaches for them directly, so
//! tests can hand it any catalog they like.

use std::sync::LazyLock;

/// One required configuration line.
///
/// # Invariant
///
/// - The presence key is always a substring of the line to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    key: String,
    line: String,
}

impl Entry {
    /// Construct new entry.
    ///
    /// # Panics
    ///
    /// - Debug builds panic if `key` is not a substring of `line`.
    pub fn new(key: impl Into<String>, line: impl Into<String>) -> Self {
        let key = key.into();
        let line = line.into();
        debug_assert!(
            line.contains(&key),
            "entry key {key:?} must be a substring of {line:?}"
        );

        Self { key, line }
    }

    /// Entry whose presence key is the whole line, e.g., ignore patterns.
    pub fn pattern(line: impl Into<String>) -> Self {
        let line = line.into();
        Self {
            key: line.clone(),
            line,
        }
    }

    /// Substring used to test whether the entry is already configured.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Exact text to insert when the entry is missing.
    pub fn line(&self) -> &str {
        &self.line
    }
}

/// Named group of entries sharing one heading comment.
///
/// The heading text doubles as the presence key of the section itself. It may
/// span multiple comment lines, but never carries a trailing newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSection {
    heading: String,
    entries: Vec<Entry>,
}

impl CatalogSection {
    /// Construct new catalog section.
    pub fn new(heading: impl Into<String>, entries: impl IntoIterator<Item = Entry>) -> Self {
        Self {
            heading: heading.into().trim_end_matches('\n').to_string(),
            entries: entries.into_iter().collect(),
        }
    }

    /// Full heading text.
    pub fn heading(&self) -> &str {
        &self.heading
    }

    /// First line of heading without the comment prefix.
    ///
    /// Used for change descriptions.
    pub fn title(&self) -> &str {
        let first = self.heading.lines().next().unwrap_or_default();
        first.trim_start_matches('#').trim()
    }

    /// Required entries in catalog order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

/// Ordered listing of sections for one managed file.
///
/// Also carries the anchor markers of the file, most specific first. See
/// [`locate_anchor`](crate::profile::anchor::locate_anchor).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    sections: Vec<CatalogSection>,
    anchors: Vec<String>,
}

impl Catalog {
    /// Construct new catalog.
    pub fn new(
        sections: impl IntoIterator<Item = CatalogSection>,
        anchors: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            sections: sections.into_iter().collect(),
            anchors: anchors.into_iter().map(Into::into).collect(),
        }
    }

    /// Sections in catalog order.
    pub fn sections(&self) -> &[CatalogSection] {
        &self.sections
    }

    /// Anchor markers in priority order.
    pub fn anchors(&self) -> &[String] {
        &self.anchors
    }

    /// All section headings in catalog order.
    pub fn headings(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(CatalogSection::heading)
    }
}

static ENVRC_CATALOG: LazyLock<Catalog> = LazyLock::new(|| {
    let export = |name: &str, value: &str| {
        Entry::new(name, format!(r#"export {name}="$WORKSPACE_HOME/{value}""#))
    };

    Catalog::new(
        [
            CatalogSection::new(
                "# XDG Base Directory specification\n\
                 # Point all XDG-compliant tools to workspace-specific config",
                [export("XDG_CONFIG_HOME", ".config")],
            ),
            CatalogSection::new(
                "# Git configuration",
                [export("GIT_CONFIG_GLOBAL", ".gitconfig")],
            ),
            CatalogSection::new(
                "# AWS configuration\n\
                 # Point AWS CLI and SDKs to workspace-specific config and credentials",
                [
                    export("AWS_CONFIG_FILE", ".aws/config"),
                    export("AWS_SHARED_CREDENTIALS_FILE", ".aws/credentials"),
                ],
            ),
            CatalogSection::new(
                "# Kubernetes configuration\n\
                 # Point kubectl to workspace-specific kubeconfig",
                [export("KUBECONFIG", ".kube/config")],
            ),
            CatalogSection::new(
                "# Terraform configuration\n\
                 # Use workspace-specific Terraform CLI config",
                [export("TF_CLI_CONFIG_FILE", ".terraformrc")],
            ),
            CatalogSection::new(
                "# Azure CLI configuration\n\
                 # Point Azure CLI to workspace-specific config directory",
                [export("AZURE_CONFIG_DIR", ".azure")],
            ),
            CatalogSection::new(
                "# Google Cloud SDK configuration\n\
                 # Point gcloud CLI to workspace-specific config directory",
                [export("CLOUDSDK_CONFIG", ".gcloud")],
            ),
            CatalogSection::new(
                "# Claude Code configuration\n\
                 # Point Claude Code to workspace-specific config directory",
                [export("CLAUDE_CONFIG_DIR", ".config/claude")],
            ),
            CatalogSection::new(
                "# Gemini CLI configuration\n\
                 # Point Gemini CLI to workspace-specific config directory",
                [export("GEMINI_CONFIG_DIR", ".config/gemini")],
            ),
        ],
        [
            "# Load .env file if it exists",
            "dotenv_if_exists .env",
            "# Welcome message",
        ],
    )
});

static GITIGNORE_CATALOG: LazyLock<Catalog> = LazyLock::new(|| {
    Catalog::new(
        [
            CatalogSection::new(
                "# Azure CLI credentials and sensitive config",
                [
                    Entry::pattern(".azure/config"),
                    Entry::pattern(".azure/clouds.config"),
                    Entry::pattern(".azure/accessTokens.json"),
                    Entry::pattern(".azure/msal_token_cache.json"),
                    Entry::pattern(".azure/azureProfile.json"),
                ],
            ),
            CatalogSection::new(
                "# Google Cloud SDK credentials and sensitive config",
                [
                    Entry::new(".gcloud/configurations", ".gcloud/configurations/"),
                    Entry::pattern(".gcloud/credentials"),
                    Entry::pattern(".gcloud/access_tokens.db"),
                    Entry::new(".gcloud/legacy_credentials", ".gcloud/legacy_credentials/"),
                    Entry::new(".gcloud/logs", ".gcloud/logs/"),
                ],
            ),
            CatalogSection::new(
                "# Claude Code configuration (may contain API keys and sensitive data)",
                [Entry::pattern(".config/claude/")],
            ),
            CatalogSection::new(
                "# Gemini CLI configuration (may contain API keys and sensitive data)",
                [Entry::pattern(".config/gemini/")],
            ),
        ],
        ["# Terraform"],
    )
});

/// Catalog of the activation script.
pub fn envrc_catalog() -> &'static Catalog {
    &ENVRC_CATALOG
}

/// Catalog of the ignore-list.
pub fn gitignore_catalog() -> &'static Catalog {
    &GITIGNORE_CATALOG
}

/// Ignore-list written when a profile has none at all.
///
/// Satisfies [`gitignore_catalog`] in full.
pub const DEFAULT_GITIGNORE: &str = "\
# Workspace profile gitignore

# Environment files with secrets
.env
.envrc.local

# SSH keys and sensitive files
.ssh/id_*
.ssh/*.pem
.ssh/*.key
.ssh/known_hosts

# AWS credentials and sensitive config
.aws/credentials
.aws/cli/cache
.aws/sso/cache

# Azure CLI credentials and sensitive config
.azure/config
.azure/clouds.config
.azure/accessTokens.json
.azure/msal_token_cache.json
.azure/azureProfile.json

# Google Cloud SDK credentials and sensitive config
.gcloud/configurations/
.gcloud/credentials
.gcloud/access_tokens.db
.gcloud/legacy_credentials/
.gcloud/logs/

# Claude Code configuration (may contain API keys and sensitive data)
.config/claude/

# Gemini CLI configuration (may contain API keys and sensitive data)
.config/gemini/

# Terraform
.terraform/
.terraform.lock.hcl
*.tfstate
*.tfstate.*
*.tfvars
.terraform.d/plugin-cache/
.terraform.d/checkpoint_cache
.terraform.d/checkpoint_signature

# Terragrunt
.terragrunt-cache/
*.tfplan

# Kubernetes
.kube/cache
.kube/http-cache

# OS files
.DS_Store
Thumbs.db

# Editor files
.vscode/
.idea/
*.swp
*.swo
*~

# Build artifacts
bin/
dist/
build/
*.log
";
