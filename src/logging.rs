//! ログ初期化
//!
//! デフォルトは`warn`、`--verbose`で`debug`。`RUST_LOG`があればそちらを優先。

use env_logger::Env;

pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    // テストなどで二重初期化されても無視する
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}
