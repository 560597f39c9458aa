//! `sakura doctor` -- check that everything Sakura needs is in place.
//!
//! Reports the config file, Ollama reachability, whether the model is
//! pulled, the helper binaries the tools shell out to, and voice input.

use std::process::ExitCode;

use comfy_table::{Table, presets::UTF8_FULL};
use sakura_llm::OllamaClient;
use sakura_platform::NativePlatform;
use sakura_types::config::{Config, VoiceBackend};
use sakura_types::error::SakuraError;

use super::{GlobalOpts, OllamaProblem, check_ollama, load_config};

const OK: &str = "ok";
const WARN: &str = "warn";
const FAIL: &str = "FAIL";

/// One row of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Check {
    name: String,
    status: &'static str,
    detail: String,
}

impl Check {
    fn new(name: impl Into<String>, status: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            detail: detail.into(),
        }
    }
}

pub async fn run(opts: &GlobalOpts) -> anyhow::Result<ExitCode> {
    let platform = NativePlatform::new();
    let mut checks = Vec::new();

    let config = match load_config(&platform, opts).await {
        Ok(loaded) => {
            let detail = match loaded.path {
                Some(path) => path.display().to_string(),
                None => "not found, using defaults".to_string(),
            };
            checks.push(Check::new("config", OK, detail));
            loaded.config
        }
        Err(e @ (SakuraError::ConfigNotFound { .. } | SakuraError::ConfigInvalid { .. })) => {
            checks.push(Check::new("config", FAIL, e.to_string()));
            let mut config = Config::default();
            super::apply_overrides(&mut config, opts);
            config
        }
        Err(e) => return Err(e.into()),
    };

    let ollama = OllamaClient::new(config.ollama_base_url.clone());
    checks.extend(ollama_checks(&ollama, &config.ollama_model).await);
    checks.extend(binary_checks());
    checks.extend(voice_checks(&config));

    println!("{}", report_table(&checks));

    let failed = checks.iter().filter(|c| c.status == FAIL).count();
    if failed == 0 {
        println!("✨ Everything looks ready, Master!");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("😣 {failed} check(s) failed, Master.");
        Ok(ExitCode::FAILURE)
    }
}

async fn ollama_checks(client: &OllamaClient, model: &str) -> Vec<Check> {
    let version = match check_ollama(client).await {
        Ok(version) => version,
        Err(problem) => {
            let detail = match problem {
                OllamaProblem::Unreachable(url) => format!("cannot connect to {url}"),
                OllamaProblem::Unhealthy(url) => format!("unexpected answer from {url}"),
            };
            return vec![
                Check::new("ollama", FAIL, detail),
                Check::new("model", WARN, format!("{model} (not checked)")),
            ];
        }
    };

    let model_check = match client.has_model(model).await {
        Ok(true) => Check::new("model", OK, model),
        Ok(false) => Check::new("model", FAIL, format!("run: ollama pull {model}")),
        Err(e) => Check::new("model", WARN, format!("could not list models: {e}")),
    };
    vec![
        Check::new(
            "ollama",
            OK,
            format!("{} (version {version})", client.base_url()),
        ),
        model_check,
    ]
}

fn process_lister() -> &'static str {
    if cfg!(windows) { "tasklist" } else { "ps" }
}

fn binary_checks() -> Vec<Check> {
    ["grep", process_lister()]
        .into_iter()
        .map(|bin| match which::which(bin) {
            Ok(path) => Check::new(bin, OK, path.display().to_string()),
            Err(_) => Check::new(bin, WARN, "not found on PATH"),
        })
        .collect()
}

fn voice_checks(config: &Config) -> Vec<Check> {
    let voice = &config.voice;
    if !voice.enabled {
        return vec![Check::new("voice", OK, "disabled (enable with --voice)")];
    }

    let mut checks = Vec::new();
    match voice.backend {
        VoiceBackend::Server => checks.push(Check::new(
            "voice",
            OK,
            format!("whisper server at {}", voice.server_url),
        )),
        VoiceBackend::Local => {
            let model = sakura_voice::stt::model_path(&voice.resolved_model_dir(), &voice.model_size);
            if model.exists() {
                checks.push(Check::new("voice", OK, model.display().to_string()));
            } else {
                checks.push(Check::new(
                    "voice",
                    FAIL,
                    format!("model missing: {}", model.display()),
                ));
            }
        }
    }

    let devices = sakura_voice::capture::list_devices();
    if devices.is_empty() {
        checks.push(Check::new("microphone", WARN, "no input devices found"));
    } else {
        checks.push(Check::new("microphone", OK, devices.join(", ")));
    }
    checks
}

fn report_table(checks: &[Check]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["CHECK", "STATUS", "DETAIL"]);
    for check in checks {
        table.add_row([check.name.as_str(), check.status, check.detail.as_str()]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_disabled_is_fine() {
        let checks = voice_checks(&Config::default());
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].status, OK);
    }

    #[test]
    fn missing_local_model_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.voice.enabled = true;
        config.voice.backend = VoiceBackend::Local;
        config.voice.model_dir = Some(dir.path().to_path_buf());
        let checks = voice_checks(&config);
        assert_eq!(checks[0].status, FAIL);
        assert!(checks[0].detail.contains("ggml-base.bin"));
    }

    #[test]
    fn server_backend_reports_url() {
        let mut config = Config::default();
        config.voice.enabled = true;
        config.voice.server_url = "http://127.0.0.1:8080".into();
        let checks = voice_checks(&config);
        assert!(checks[0].detail.contains("http://127.0.0.1:8080"));
    }

    #[test]
    fn lister_matches_platform() {
        let checks = binary_checks();
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].name, "grep");
        assert_eq!(checks[1].name, process_lister());
    }

    #[tokio::test]
    async fn ollama_down_skips_model() {
        let checks = ollama_checks(&OllamaClient::new("http://127.0.0.1:1"), "phi3:mini").await;
        assert_eq!(checks[0].status, FAIL);
        assert_eq!(checks[1].status, WARN);
    }

    #[tokio::test]
    async fn ollama_up_checks_model() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"version": "0.5.7"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"models": [{"name": "phi3:mini"}]}),
            ))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri());
        let checks = ollama_checks(&client, "phi3:mini").await;
        assert_eq!(checks[0].status, OK);
        assert!(checks[0].detail.contains("0.5.7"));
        assert_eq!(checks[1].status, OK);

        let checks = ollama_checks(&client, "llama3").await;
        assert_eq!(checks[1].status, FAIL);
        assert_eq!(checks[1].detail, "run: ollama pull llama3");
    }

    #[test]
    fn table_has_rows() {
        let rendered = report_table(&[Check::new("grep", OK, "/usr/bin/grep")]).to_string();
        assert!(rendered.contains("CHECK"));
        assert!(rendered.contains("/usr/bin/grep"));
    }
}
