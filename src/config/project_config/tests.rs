use super::*;

#[test]
fn test_defaults_are_valid() {
    let config = ProjectConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.generator.seed, 42);
    assert_eq!(config.corpus.max_lines, 20_000);
    assert_eq!(config.scoring.metric, "js_bigram");
    assert_eq!(config.policy.min_tags, 3);
    assert_eq!(config.policy.max_tags, 6);
}

#[test]
fn test_template_parses_and_validates() {
    let config: ProjectConfig = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
    assert!(config.validate().is_ok());
    assert!(config
        .policy
        .rhetorical_markers
        .iter()
        .any(|m| m == "[rhetorical]"));
    assert_eq!(config.generator.stream, "A");
}

#[test]
fn test_template_policy_matches_builtin_defaults() {
    let config: ProjectConfig = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
    assert_eq!(config.policy, PolicyConfig::default());
    assert_eq!(config.corpus.max_lines, CorpusConfig::default().max_lines);
    assert_eq!(config.scoring.metric, ScoringConfig::default().metric);
}

#[test]
fn test_partial_config_keeps_defaults() {
    let config: ProjectConfig = toml::from_str(
        r#"
[generator]
seed = 7
"#,
    )
    .unwrap();
    assert_eq!(config.generator.seed, 7);
    assert_eq!(config.generator.words_per_line, 8);
    assert!(!config.policy.modern_terms.is_empty());
}

#[test]
fn test_validate_rejects_zero_lines_per_card() {
    let mut config = ProjectConfig::default();
    config.generator.lines_per_card = 0;
    assert!(matches!(
        config.validate(),
        Err(ScriptoriumError::Config(_))
    ));
}

#[test]
fn test_validate_rejects_negative_seed_weight() {
    let mut config = ProjectConfig::default();
    config.generator.seed_weight = -1.0;
    assert!(config.validate().is_err());
    config.generator.seed_weight = f64::NAN;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_inverted_tag_bounds() {
    let mut config = ProjectConfig::default();
    config.policy.min_tags = 7;
    assert!(config.validate().is_err());
}

#[test]
fn test_load_project_config_falls_back_on_bad_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "this is [not toml").unwrap();
    let config = load_project_config(dir.path());
    assert_eq!(config.generator.seed, 42);
}

#[test]
fn test_load_project_config_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[corpus]\nmax_lines = 10\n",
    )
    .unwrap();
    let config = load_project_config(dir.path());
    assert_eq!(config.corpus.max_lines, 10);
}

#[test]
fn test_load_config_file_is_strict() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[generator]\nwords_per_line = 0\n").unwrap();
    assert!(load_config_file(&path).is_err());
    assert!(load_config_file(&dir.path().join("missing.toml")).is_err());
}
