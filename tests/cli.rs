#[cfg(test)]
mod tests {
    use std::fs;
    use std::process::Command;

    fn iconforge() -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_iconforge"));
        cmd.env_remove("ICONFORGE_FONT");
        cmd
    }

    #[test]
    fn writes_icons_and_exits_zero() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("public");

        let output = iconforge()
            .current_dir(tmp.path())
            .env("ICONFORGE_OUTPUT_DIR", &out)
            .output()
            .unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Saved"));
        assert!(out.join("icon-192.png").is_file());
        assert!(out.join("icon-512.png").is_file());
    }

    // 输出目录无法创建时, 进程以 1 退出
    #[test]
    fn unwritable_output_dir_exits_one() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, b"").unwrap();

        let output = iconforge()
            .current_dir(tmp.path())
            .env("ICONFORGE_OUTPUT_DIR", blocker.join("public"))
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("[!] Error: Failed to create output directory"));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(!stderr.is_empty());
    }
}
