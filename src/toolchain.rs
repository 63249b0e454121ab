//! Go toolchain glue: executable introspection, proxy discovery, and
//! (re)installation.
//!
//! Everything here shells out to the local `go` command; no version or
//! repository logic lives in this module.

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result, bail};
use tokio::process::Command;
use tracing::debug;

use crate::version::catalog::STD_MODULE;
use crate::version::dl;

/// Module identity embedded in a built Go executable.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutableInfo {
    /// Package path that built the main binary.
    pub package_path: String,
    /// Module path owning that package.
    pub module_path: String,
    /// Installed version of the module.
    pub version: String,
}

/// Runner for go commands.
#[derive(Debug, Default)]
pub struct Toolchain {}

impl Toolchain {
    pub fn new() -> Self {
        Self::default()
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("go");
        cmd.args(args);
        cmd
    }

    async fn output(&self, args: &[&str]) -> Result<String> {
        debug!("go {}", args.join(" "));
        let out = self
            .command(args)
            .output()
            .await
            .with_context(|| format!("failed to run go {}", args.join(" ")))?;
        if !out.status.success() {
            bail!(
                "go {}: {}",
                args.join(" "),
                String::from_utf8_lossy(&out.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }

    /// Reads the module identity embedded in the executable named or
    /// pointed to by `exe`, resolving it through `PATH` first.
    pub async fn executable_info(&self, exe: &str) -> Result<ExecutableInfo> {
        let exe = which::which(exe).with_context(|| format!("cannot find executable {exe}"))?;
        let exe = exe.to_str().context("executable path is not UTF-8")?;
        let stdout = self.output(&["version", "-m", exe]).await?;
        parse_version_output(&stdout)
    }

    /// Returns the module proxies configured in `go env GOPROXY`,
    /// excluding the non-network `off` and `direct` entries.
    pub async fn proxies(&self) -> Result<Vec<String>> {
        let goproxy = self.output(&["env", "GOPROXY"]).await?;
        Ok(parse_goproxy(&goproxy))
    }

    /// Installs `package_path` at `version` with `go install`. For the
    /// standard library the SDK download flow is used instead.
    pub async fn install(
        &self,
        client: &reqwest::Client,
        package_path: &str,
        module_path: &str,
        version: &str,
        verbose: bool,
        commands: bool,
    ) -> Result<()> {
        if module_path == STD_MODULE {
            return self.install_std(client, version, verbose).await;
        }

        let target = format!("{package_path}@{version}");
        let mut args = vec!["install"];
        if verbose {
            args.push("-v");
        }
        if commands {
            args.push("-x");
        }
        args.push(&target);

        if verbose || commands {
            debug!("go {}", args.join(" "));
            let status = self
                .command(&args)
                .status()
                .await
                .context("failed to run go install")?;
            if !status.success() {
                bail!("go install {target} failed");
            }
            Ok(())
        } else {
            self.output(&args).await.map(drop)
        }
    }

    /// Installs the Go toolchain and standard library at `version` via
    /// the golang.org/dl wrapper commands.
    async fn install_std(
        &self,
        client: &reqwest::Client,
        version: &str,
        verbose: bool,
    ) -> Result<()> {
        let version = if version == "latest" {
            let releases = dl::releases(client, dl::DEFAULT_INDEX_URL).await?;
            releases
                .first()
                .context("no toolchain releases found")?
                .version
                .clone()
        } else {
            version.to_string()
        };

        self.output(&["install", &format!("golang.org/dl/{version}@latest")])
            .await?;

        let mut cmd = Command::new(&version);
        cmd.arg("download");
        if !verbose {
            cmd.stderr(Stdio::null());
        }
        let status = cmd
            .status()
            .await
            .with_context(|| format!("failed to run {version} download"))?;
        if !status.success() {
            bail!("{version} download failed");
        }
        if !verbose {
            eprintln!("go tool available as {version}");
        }
        Ok(())
    }
}

/// Parses `go version -m` output.
///
/// Expected shape:
///
/// ```text
/// /usr/local/bin/tool: go1.21.5
///         path    github.com/foo/tool
///         mod     github.com/foo/tool v1.2.3  h1:abcd...
/// ```
fn parse_version_output(stdout: &str) -> Result<ExecutableInfo> {
    let mut package_path = String::new();
    let mut module_path = String::new();
    let mut version = String::new();
    let mut main = String::new();

    for line in stdout.lines() {
        if line.is_empty() {
            continue;
        }
        if let Some((name, toolchain)) = line.split_once(": ") {
            main = name.to_string();
            version = toolchain.to_string();
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.first().copied() {
            Some("path") => {
                if fields.len() < 2 {
                    bail!("unexpected path information format: {line:?}");
                }
                package_path = fields[1].to_string();
            }
            Some("mod") => {
                if fields.len() < 3 {
                    bail!("unexpected module information format: {line:?}");
                }
                module_path = fields[1].to_string();
                version = fields[2].to_string();
            }
            _ => {}
        }
        if !package_path.is_empty() && !module_path.is_empty() && !version.is_empty() {
            return Ok(ExecutableInfo {
                package_path,
                module_path,
                version,
            });
        }
    }

    // Standard-library binaries (gofmt, go itself) report a toolchain
    // version but no module block.
    if version.starts_with("go") {
        let base = Path::new(&main)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(main.as_str());
        return Ok(ExecutableInfo {
            package_path: format!("cmd/{base}"),
            module_path: STD_MODULE.to_string(),
            version,
        });
    }
    bail!("not a go binary or no module information")
}

fn parse_goproxy(goproxy: &str) -> Vec<String> {
    goproxy
        .trim()
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty() && *p != "off" && *p != "direct")
        .map(str::to_string)
        .collect()
}
