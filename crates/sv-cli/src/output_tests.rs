use super::*;

fn sample() -> Vec<InstanceStatus> {
    vec![InstanceStatus {
        name: "web".to_string(),
        group: "web".to_string(),
        state: "running".to_string(),
        pid: Some(42),
        uptime_secs: Some(10),
        healthy: Some(true),
    }]
}

#[test]
fn print_status_text_does_not_error_on_empty() {
    print_status(&[], OutputFormat::Text).unwrap();
}

#[test]
fn print_status_json_does_not_error() {
    print_status(&sample(), OutputFormat::Json).unwrap();
}

#[test]
fn print_reload_result_text_does_not_error() {
    let result = ReloadResult {
        added: vec!["web".to_string()],
        removed: vec![],
        changed: vec![],
    };
    print_reload_result(&result, OutputFormat::Text).unwrap();
}
