use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(
    name = "license-manifest",
    about = "Generate one open source license JSON for an Android + npm project",
    version
)]
pub struct Cli {
    /// Project directory [default: current directory]
    #[arg(short, long, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Android project directory [default: <project>/android]
    #[arg(short = 'a', long = "androidProject", alias = "android-project", value_name = "DIR")]
    pub android_project: Option<PathBuf>,

    /// License JSON written by the Gradle task [default: <androidProject>/src/main/assets/licenses.json]
    #[arg(
        short = 'l',
        long = "androidLicenseFile",
        alias = "android-license-file",
        value_name = "FILE"
    )]
    pub android_license_file: Option<PathBuf>,

    /// Output file [default: <project>/licenses.json]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Config file [default: <project>/.license-manifest/config.toml, fallback ~/.config/license-manifest/config.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Use the existing Android license JSON instead of running Gradle
    #[arg(long)]
    pub skip_android_build: bool,

    /// How installed npm packages are enumerated
    #[arg(long, value_name = "SCANNER")]
    pub scanner: Option<ScannerKind>,

    /// Verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Don't print the summary
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ScannerKind {
    /// Walk `<project>/node_modules` in-process
    NodeModules,
    /// Run the `license-checker` npm tool
    LicenseChecker,
}
