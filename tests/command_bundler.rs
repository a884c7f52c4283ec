use kodegen_bundler_serverless::bundler::{
    BundleOptions, BundlerFactory, CommandBundler, CommandBundlerFactory, Error,
};
use serde_json::json;
use std::path::Path;

fn options(out_dir: &str) -> BundleOptions {
    BundleOptions::default().with_out_dir(out_dir)
}

#[test]
fn default_arguments() {
    let args = CommandBundler::build_args("src/handler.[jt]s", &options(".build/src"));

    assert_eq!(
        args,
        [
            "build",
            "src/handler.[jt]s",
            "--out-dir",
            ".build/src",
            "--target",
            "node",
            "--no-cache",
        ]
    );
}

#[test]
fn pass_through_options_become_flags() {
    let mut options = options("out");
    options.cache = true;
    options.target = "browser".into();
    options.extra.insert("minify".into(), json!(true));
    options.extra.insert("source-maps".into(), json!(false));
    options.extra.insert("public-url".into(), json!("./"));
    options.extra.insert("log-level".into(), json!(3));
    options.extra.insert("external".into(), json!(["aws-sdk", "pg"]));
    options.extra.insert("ignored".into(), json!(null));

    let args = CommandBundler::build_args("a.[jt]s", &options);

    assert!(!args.contains(&"--no-cache".to_string()));
    assert_eq!(
        &args[6..],
        [
            "--external",
            "aws-sdk",
            "--external",
            "pg",
            "--log-level",
            "3",
            "--minify",
            "--public-url",
            "./",
            "--no-source-maps",
        ]
    );
}

#[test]
fn module_path_swaps_pattern_for_js() {
    assert_eq!(
        CommandBundler::module_path("src/handler.[jt]s", Path::new(".build/src")),
        Path::new(".build/src/handler.js")
    );
    assert_eq!(
        CommandBundler::module_path("handler", Path::new(".build")),
        Path::new(".build/handler.js")
    );
}

#[test]
fn missing_program_is_reported() {
    let err = CommandBundlerFactory::locate("definitely-not-a-bundler-4f1c", "/svc").unwrap_err();
    assert!(matches!(err, Error::ToolNotFound(name) if name == "definitely-not-a-bundler-4f1c"));
}

#[test]
fn factory_is_named_after_the_program() {
    let factory = CommandBundlerFactory::with_program("/usr/local/bin/parcel", "/svc");
    assert_eq!(factory.name(), "parcel");
}

#[cfg(unix)]
mod process {
    use super::*;
    use kodegen_bundler_serverless::bundler::EntryBundler;
    use std::os::unix::fs::PermissionsExt;
    use std::time::Duration;

    /// Fake bundler that records its arguments and emits the module.
    fn fake_bundler(dir: &Path, exit_code: i32) -> std::path::PathBuf {
        let script = dir.join("fake-bundler");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\n\
                 echo \"$@\" > args.txt\n\
                 mkdir -p \"$4\"\n\
                 echo 'module.exports = {{}}' > \"$4/handler.js\"\n\
                 echo 'bundler stderr' >&2\n\
                 exit {exit_code}\n"
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[tokio::test]
    async fn runs_program_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let factory = CommandBundlerFactory::with_program(fake_bundler(dir.path(), 0), dir.path());

        let mut bundler = factory.create("src/handler.[jt]s", &options(".build/src"));
        let handle = bundler.bundle().await.unwrap();

        assert_eq!(handle.entry, "src/handler.[jt]s");
        assert_eq!(handle.module_path, Path::new(".build/src/handler.js"));
        assert!(dir.path().join(".build/src/handler.js").is_file());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("args.txt")).unwrap().trim(),
            "build src/handler.[jt]s --out-dir .build/src --target node --no-cache"
        );
        assert!(bundler.rebuilds().is_none(), "no watcher without watch mode");
    }

    #[tokio::test]
    async fn non_zero_exit_fails_with_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let factory = CommandBundlerFactory::with_program(fake_bundler(dir.path(), 2), dir.path());

        let err = factory
            .create("src/handler.[jt]s", &options(".build/src"))
            .bundle()
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("bundler stderr"), "{err:#}");
    }

    /// Fake bundler that counts its runs in `runs.txt`.
    fn counting_bundler(dir: &Path) -> std::path::PathBuf {
        let script = dir.join("counting-bundler");
        std::fs::write(
            &script,
            "#!/bin/sh\n\
             echo run >> runs.txt\n\
             mkdir -p \"$4\"\n\
             touch \"$4/handler.js\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    fn runs(dir: &Path) -> usize {
        std::fs::read_to_string(dir.join("runs.txt"))
            .map(|s| s.lines().count())
            .unwrap_or(0)
    }

    fn watching(out_dir: &str) -> BundleOptions {
        options(out_dir).with_watch(true)
    }

    #[tokio::test]
    async fn source_change_rebuilds_and_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("src/handler.js");
        std::fs::create_dir_all(source.parent().unwrap()).unwrap();
        std::fs::write(&source, "exports.hello = 1").unwrap();
        let factory = CommandBundlerFactory::with_program(counting_bundler(dir.path()), dir.path());

        let mut bundler = factory.create("src/handler.[jt]s", &watching(".build/src"));
        bundler.bundle().await.unwrap();
        let mut rebuilds = bundler.rebuilds().expect("watch mode offers rebuilds");
        assert_eq!(runs(dir.path()), 1);

        std::fs::write(&source, "exports.hello = 2").unwrap();
        let event = tokio::time::timeout(Duration::from_secs(10), rebuilds.recv())
            .await
            .expect("rebuild after a source change")
            .unwrap();

        assert_eq!(event.entry, "src/handler.[jt]s");
        assert_eq!(runs(dir.path()), 2);
    }

    #[tokio::test]
    async fn dropped_listener_stops_rebuilds() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("src/handler.js");
        std::fs::create_dir_all(source.parent().unwrap()).unwrap();
        std::fs::write(&source, "exports.hello = 1").unwrap();
        let factory = CommandBundlerFactory::with_program(counting_bundler(dir.path()), dir.path());

        let mut bundler = factory.create("src/handler.[jt]s", &watching(".build/src"));
        bundler.bundle().await.unwrap();
        drop(bundler.rebuilds());
        drop(bundler);
        std::fs::remove_dir_all(dir.path().join(".build")).unwrap();

        std::fs::write(&source, "exports.hello = 2").unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(runs(dir.path()), 1, "no rebuild once the listener is gone");
        assert!(!dir.path().join(".build").exists(), "build folder stays removed");
    }
}
