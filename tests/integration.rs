use std::path::Path;
use std::process::Command;

fn apilink_cmd(fixture: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_apilink"));
    cmd.current_dir(Path::new("tests/fixtures").join(fixture));
    cmd
}

#[test]
fn build_renders_site_with_api_links() {
    let dist = Path::new("tests/fixtures/site/dist");
    let _ = std::fs::remove_dir_all(dist);

    let build = apilink_cmd("site").arg("build").output().unwrap();
    assert!(
        build.status.success(),
        "build failed: {}",
        String::from_utf8_lossy(&build.stderr)
    );

    let auth_setup = std::fs::read_to_string(dist.join("guide/auth/setup.html")).unwrap();
    assert!(
        auth_setup.contains(
            "<a href=\"../../api/auth/ModuleScope.html\" class=\"api-link\"><code>ModuleScope</code></a>"
        ),
        "symbol mention not linked:\n{auth_setup}"
    );
    assert!(
        auth_setup.contains("<DartPad "),
        "playground fence not embedded:\n{auth_setup}"
    );
    assert!(
        auth_setup.contains(":height=\"400\""),
        "fence attributes dropped:\n{auth_setup}"
    );

    let core_setup = std::fs::read_to_string(dist.join("guide/core/setup.html")).unwrap();
    assert!(
        core_setup.contains("href=\"../../api/core/ModuleScope.html\""),
        "page context ignored:\n{core_setup}"
    );

    let token_page = std::fs::read_to_string(dist.join("api/auth/Token.html")).unwrap();
    assert!(
        !token_page.contains("href=\"./Token.html\""),
        "reference page linked to itself:\n{token_page}"
    );
    assert!(
        token_page.contains("href=\"./ModuleScope.html\""),
        "sibling reference not linked:\n{token_page}"
    );

    assert!(
        !dist.join("drafts/wip.html").exists(),
        "excluded draft was rendered"
    );
}

#[test]
fn symbols_lists_catalog_as_json() {
    let output = apilink_cmd("site")
        .args(["symbols", "--json"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "symbols failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["name"].as_str().unwrap())
        .collect();
    let packages: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["package"].as_str().unwrap())
        .collect();

    assert_eq!(names, ["ModuleScope", "ModuleScope", "Token"]);
    assert_eq!(packages, ["auth", "core", "auth"]);
}
