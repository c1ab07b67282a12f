use batchinst_common::AppConfig;
use color_eyre::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::{
    args::Format,
    download::Download,
    menu::select,
    session::Session,
    utils::{format_output, report},
};

#[derive(Debug, Serialize, Tabled)]
struct App {
    #[tabled(rename = "#")]
    number: usize,
    name: String,
    url: String,
}

fn rows(config: &AppConfig) -> Vec<App> {
    config
        .iter()
        .map(|app| App {
            number: app.number,
            name: app.name.clone(),
            url: app.url.clone(),
        })
        .collect()
}

pub(crate) fn list(config: &AppConfig, format: Format) -> Result<()> {
    println!("{}", format_output(rows(config), format)?);
    Ok(())
}

pub(crate) fn install<D: Download>(session: &Session<D>, number: usize) -> Result<()> {
    if let Some(app) = report(select(&session.config, &number.to_string()))? {
        report(session.installer.install(app))?;
    }
    Ok(())
}

#[test]
fn rows_follow_config_order() {
    let config = AppConfig::parse("B;http://e.com/b.exe;x\n#\nA;http://e.com/a.exe;y").unwrap();
    let rows = rows(&config);
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].number, rows[0].name.as_str()), (1, "B"));
    assert_eq!((rows[1].number, rows[1].url.as_str()), (3, "http://e.com/a.exe"));
}
