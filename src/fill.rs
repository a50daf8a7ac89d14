//! フォーム記入の実行（同期/非同期）と結果の表示・保存

use crate::client::{AsyncDatalabClient, ClientSettings, DatalabClient, FormSource};
use crate::config::Config;
use crate::error::{FormFillError, Result};
use form_fill_common::{FillOptions, FillResult};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 出力先のデフォルト: カレントディレクトリの `filled_<元のファイル名>`
///
/// ファイル名は最後の `/` 以降をそのまま使う（末尾が `/` なら空）。
/// 拡張子も含めて元の名前を保つので、`filled_<stem><ext>` と同じになる。
pub fn default_output_path(form: &str) -> PathBuf {
    let basename = form.rsplit('/').next().unwrap_or_default();
    PathBuf::from(format!("filled_{}", basename))
}

/// `-o` 指定があればそれを、無ければデフォルトを使う
pub fn resolve_output_path(form: &str, output: Option<&Path>) -> PathBuf {
    output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(form))
}

/// 結果サマリを出力
pub fn print_result_summary<W: Write>(result: &FillResult, out: &mut W) -> Result<()> {
    writeln!(out, "Success: {}", result.success)?;
    writeln!(out, "Status: {}", result.status)?;
    writeln!(out, "Output format: {}", display_or_unknown(result.output_format.as_deref()))?;
    writeln!(out, "Pages processed: {}", display_or_unknown(result.page_count))?;
    writeln!(out, "Fields filled: {}", display_or_unknown(result.fields_filled))?;
    if !result.fields_not_found.is_empty() {
        writeln!(out, "Fields not found: {:?}", result.fields_not_found)?;
    }
    Ok(())
}

fn display_or_unknown<T: std::fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// サマリ表示 → 保存 → 保存先表示
fn finish<W: Write>(result: &FillResult, output_path: &Path, out: &mut W) -> Result<()> {
    print_result_summary(result, out)?;
    result.save_output(output_path)?;
    writeln!(out, "Saved to: {}", output_path.display())?;
    Ok(())
}

/// APIキーを確認してクライアント設定を作る（同期・非同期共通）
///
/// ネットワークアクセスより前に呼ぶこと。
pub fn require_settings(config: &Config) -> Result<ClientSettings> {
    ClientSettings::from_config(config)
}

/// 同期クライアントで記入
pub fn fill_sync<W: Write>(
    form: &str,
    options: &FillOptions,
    output_path: &Path,
    config: &Config,
    out: &mut W,
) -> Result<FillResult> {
    let settings = require_settings(config)?;
    let client = DatalabClient::new(settings)?;
    fill_sync_with_client(&client, form, options, output_path, out)
}

pub fn fill_sync_with_client<W: Write>(
    client: &DatalabClient,
    form: &str,
    options: &FillOptions,
    output_path: &Path,
    out: &mut W,
) -> Result<FillResult> {
    let source = FormSource::classify(form);
    log::debug!("form source: {:?}", source);

    let result = client.fill(&source, options)?;
    finish(&result, output_path, out)?;
    Ok(result)
}

/// 非同期クライアントで記入
pub async fn fill_async<W: Write>(
    form: &str,
    options: &FillOptions,
    output_path: &Path,
    config: &Config,
    out: &mut W,
) -> Result<FillResult> {
    let settings = require_settings(config)?;
    let client = AsyncDatalabClient::new(settings)?;
    fill_async_with_client(client, form, options, output_path, out).await
}

/// 非同期クライアントを受け取り、成否にかかわらず最後に解放する
pub async fn fill_async_with_client<W: Write>(
    client: AsyncDatalabClient,
    form: &str,
    options: &FillOptions,
    output_path: &Path,
    out: &mut W,
) -> Result<FillResult> {
    let source = FormSource::classify(form);
    log::debug!("form source: {:?}", source);

    let outcome = match client.fill(&source, options).await {
        Ok(result) => finish(&result, output_path, out).map(|()| result),
        Err(e) => Err(e),
    };
    client.close();
    outcome
}

/// 単一タスクのランタイムで非同期経路を実行
pub fn run_async<W: Write>(
    form: &str,
    options: &FillOptions,
    output_path: &Path,
    config: &Config,
    out: &mut W,
) -> Result<FillResult> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| FormFillError::Runtime(e.to_string()))?;

    runtime.block_on(fill_async(form, options, output_path, config, out))
}
