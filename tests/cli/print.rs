use anyhow::Result;
use insta::assert_snapshot;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_single_root() -> Result<()> {
    let test = CliTest::module()?;
    test.write_file(
        "config.go",
        r#"package app

type Config struct {
    Port int `env:"PORT,default=8080"`
}
"#,
    )?;

    let output = test.command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "PORT=8080\n");

    Ok(())
}

#[test]
fn test_nested_and_cross_package() -> Result<()> {
    let test = CliTest::module()?;
    test.write_file(
        "cmd/server/main.go",
        r#"package main

import (
    "time"

    "example.com/app/internal/db"
)

type Config struct {
    Addr     string        `env:"ADDR,default=:8080"`
    Timeout  time.Duration `env:"TIMEOUT,default=30s"`
    Database db.Config     `env:",prefix=DB_"`
    Cache    CacheConfig   `env:",prefix=CACHE_"`
}

type CacheConfig struct {
    TTL  time.Duration `env:"TTL,default=1m"`
    Size int           `env:"SIZE"`
}

func main() {}
"#,
    )?;
    test.write_file(
        "internal/db/config.go",
        r#"package db

type Config struct {
    Host string `env:"HOST,default=localhost"`
    Port int    `env:"PORT,default=5432"`
}
"#,
    )?;

    let output = test.command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_snapshot!(stdout(&output), @r"
    ADDR=:8080
    TIMEOUT=30s
    DB_HOST=localhost
    DB_PORT=5432
    CACHE_TTL=1m
    CACHE_SIZE=
    HOST=localhost
    PORT=5432
    ");

    Ok(())
}

#[test]
fn test_path_argument() -> Result<()> {
    let test = CliTest::module()?;
    test.write_file(
        "config.go",
        "package app\n\ntype Config struct {\n    Name string `env:\"NAME,default=svc\"`\n}\n",
    )?;

    let output = test
        .command()
        .current_dir(test.root().parent().unwrap())
        .arg("--path")
        .arg("project")
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "NAME=svc\n");

    Ok(())
}

#[test]
fn test_dependency_from_module_cache() -> Result<()> {
    let test = CliTest::module()?;
    test.write_file(
        "config.go",
        r#"package app

import "github.com/Acme/tracing"

type Config struct {
    Trace tracing.Config `env:",prefix=OTEL_"`
}
"#,
    )?;
    let cache = test.sibling("gopath/pkg/mod")?;
    let module_dir = cache.join("github.com/!acme/tracing@v1.4.0");
    std::fs::create_dir_all(&module_dir)?;
    std::fs::write(
        module_dir.join("config.go"),
        "package tracing\n\ntype Config struct {\n    Endpoint string `env:\"ENDPOINT,default=localhost:4317\"`\n}\n",
    )?;

    let gopath = test.sibling("gopath")?;
    let output = test.command().env("GOPATH", &gopath).output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "OTEL_ENDPOINT=localhost:4317\n");

    Ok(())
}

#[test]
fn test_missing_dependency_is_skipped() -> Result<()> {
    let test = CliTest::module()?;
    test.write_file(
        "config.go",
        r#"package app

import "github.com/acme/other"

type Config struct {
    Port int            `env:"PORT,default=8080"`
    Ext  other.Settings `env:",prefix=EXT_"`
    Mode string         `env:"MODE,default=prod"`
}
"#,
    )?;
    let cache = test.sibling("modcache")?;

    let output = test
        .command()
        .arg("--verbose")
        .env("GOMODCACHE", &cache)
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "PORT=8080\nMODE=prod\n");
    assert!(stderr(&output).contains("warning: example.com/app.Config.Ext"));

    Ok(())
}

#[test]
fn test_vendor_is_preferred() -> Result<()> {
    let test = CliTest::module()?;
    test.write_file(
        "config.go",
        r#"package app

import "github.com/acme/other"

type Config struct {
    Ext other.Settings `env:",prefix=EXT_"`
}
"#,
    )?;
    test.write_file(
        "vendor/github.com/acme/other/settings.go",
        "package other\n\ntype Settings struct {\n    Key string `env:\"KEY,default=vendored\"`\n}\n",
    )?;

    let output = test.command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "EXT_KEY=vendored\n");

    Ok(())
}

#[test]
fn test_missing_go_mod() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("config.go", "package app\n")?;

    let output = test.command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout(&output), "");
    assert!(stderr(&output).contains("go.mod not found"));

    Ok(())
}

#[test]
fn test_syntax_error_aborts() -> Result<()> {
    let test = CliTest::module()?;
    test.write_file(
        "config.go",
        "package app\n\ntype Config struct {\n    Port int `env:\"PORT\"`\n}\n",
    )?;
    test.write_file("broken.go", "package app\n\nfunc (\n")?;

    let output = test.command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout(&output), "");
    assert!(stderr(&output).contains("broken.go"));

    Ok(())
}

#[test]
fn test_no_dependency_root() -> Result<()> {
    let test = CliTest::module()?;
    test.write_file(
        "config.go",
        r#"package app

import "github.com/acme/other"

type Config struct {
    Ext other.Settings `env:",prefix=EXT_"`
}
"#,
    )?;

    let output = test.command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("no vendor directory and no module cache root"));

    Ok(())
}

#[test]
fn test_config_file_tag_key() -> Result<()> {
    let test = CliTest::module()?;
    test.write_file(".goprintenv.json", r#"{ "tagKey": "envconfig", "ignores": ["testdata"] }"#)?;
    test.write_file(
        "config.go",
        "package app\n\ntype Config struct {\n    Port int `envconfig:\"PORT,default=9000\"`\n}\n",
    )?;
    test.write_file(
        "testdata/fixture.go",
        "package testdata\n\ntype Fixture struct {\n    X int `envconfig:\"X\"`\n}\n",
    )?;

    let output = test.command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "PORT=9000\n");

    Ok(())
}

#[test]
fn test_verbose_summary() -> Result<()> {
    let test = CliTest::module()?;
    test.write_file(
        "config.go",
        "package app\n\ntype Config struct {\n    Port int `env:\"PORT\"`\n}\n",
    )?;

    let output = test.command().arg("-v").output()?;

    assert!(output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("No .goprintenv.json found"));
    assert!(stderr.contains("example.com/app: 1 variable(s) from 1 root(s), 1 file(s) scanned"));

    Ok(())
}
