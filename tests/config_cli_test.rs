use anyhow::Result;
use branch_titlebar::recent::RecentLimits;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

// Complete flow: CLI args -> config loading -> runtime settings
#[test]
fn test_config_and_cli_integration() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_dir = temp_dir.path().join(".config").join("branch-titlebar");
    fs::create_dir_all(&config_dir)?;

    let config_file = config_dir.join("branch-titlebar.toml");

    let test_config = r#"
version = 1

[poll]
interval_secs = 7

[git]
program = "/usr/local/bin/git"
timeout_secs = 3

[recent]
data_dir = "/tmp/test/data"
max_categories = 2
max_items_per_category = 4
max_fallback_items = 6
"#;
    fs::write(&config_file, test_config)?;

    // Load config from file
    let config = branch_titlebar::config::Config::load(Some(config_file.clone()))?;

    assert_eq!(config.version, 1);
    assert_eq!(config.poll_interval(), Duration::from_secs(7));
    assert_eq!(config.git.program, "/usr/local/bin/git");
    assert_eq!(config.git_command().timeout(), Duration::from_secs(3));
    assert_eq!(config.data_dir()?, PathBuf::from("/tmp/test/data"));
    assert_eq!(
        config.recent_limits(),
        RecentLimits {
            max_categories: 2,
            max_items_per_category: 4,
            max_fallback_items: 6,
        }
    );

    // CLI override should work
    let cli_args = branch_titlebar::cli::CliArgs::parse_from([
        "branch-titlebar",
        "--config",
        config_file.to_str().expect("utf-8 path"),
        "--interval",
        "1",
        "--data-dir",
        "/override/data",
    ]);

    let final_config = branch_titlebar::config::Config::from_cli_and_file(&cli_args)?;
    assert_eq!(final_config.poll_interval(), Duration::from_secs(1));
    assert_eq!(final_config.data_dir()?, PathBuf::from("/override/data"));
    assert_eq!(final_config.git.timeout_secs, 3); // Other settings preserved

    // Save and reload should work
    let new_config_file = temp_dir.path().join("new_config.toml");
    final_config.save(&new_config_file)?;
    let reloaded_config = branch_titlebar::config::Config::load(Some(new_config_file))?;
    assert_eq!(reloaded_config, final_config);

    // Default config creation
    let nonexistent_file = temp_dir.path().join("nonexistent.toml");
    let default_config = branch_titlebar::config::Config::load(Some(nonexistent_file.clone()))?;
    assert_eq!(default_config.poll_interval(), Duration::from_secs(5));
    assert!(nonexistent_file.exists(), "Should create default config file");

    Ok(())
}

#[test]
fn test_default_paths() -> Result<()> {
    let config_path = branch_titlebar::config::get_default_config_path()?;
    assert!(config_path.ends_with("branch-titlebar/branch-titlebar.toml"));

    let data_dir = branch_titlebar::config::get_default_data_dir()?;
    assert!(data_dir.to_string_lossy().contains("branch-titlebar"));

    Ok(())
}
