use std::io::{BufRead, Write};

use batchinst_common::{types::AppDescriptor, AppConfig, Error};
use color_eyre::Result;
use tracing::instrument;

use crate::{download::Download, session::Session, utils::report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Menu,
    AwaitChoice,
    Exit,
}

/// Interactive menu loop, runs until the user exits or `input` is exhausted.
#[instrument(skip_all)]
pub(crate) fn run<D: Download>(
    session: &Session<D>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let mut state = State::Menu;
    loop {
        state = match state {
            State::Menu => {
                print_menu(&session.config, out)?;
                State::AwaitChoice
            }
            State::AwaitChoice => match prompt(input, out, "\nEnter your choice: ")? {
                Some(choice) => dispatch(session, &choice, input, out)?,
                None => State::Exit,
            },
            State::Exit => {
                writeln!(out, "Exiting the installer. Goodbye!")?;
                return Ok(());
            }
        }
    }
}

fn print_menu(config: &AppConfig, out: &mut impl Write) -> Result<()> {
    writeln!(out, "\nAvailable Applications:")?;
    for app in config.iter() {
        writeln!(out, "{}. {}", app.number, app.name)?;
    }
    writeln!(out, "\nMenu:")?;
    writeln!(out, "1. Install by number")?;
    writeln!(out, "2. Install all applications")?;
    writeln!(out, "3. Uninstall an application")?;
    writeln!(out, "4. Exit")?;
    Ok(())
}

fn dispatch<D: Download>(
    session: &Session<D>,
    choice: &str,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<State> {
    match choice {
        "1" => {
            let Some(answer) = prompt(
                input,
                out,
                "Enter the number of the application to install: ",
            )?
            else {
                return Ok(State::Exit);
            };
            if let Some(app) = report(select(&session.config, &answer))? {
                report(session.installer.install(app))?;
            }
        }
        "2" => {
            session.installer.install_all(&session.config)?;
        }
        "3" => return uninstall(session, input, out),
        "4" => return Ok(State::Exit),
        other => tracing::error!("invalid choice {other:?}, please try again"),
    }
    Ok(State::Menu)
}

fn uninstall<D: Download>(
    session: &Session<D>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<State> {
    let installed = session.log.installed()?;
    if installed.is_empty() {
        writeln!(out, "No applications to uninstall.")?;
        return Ok(State::Menu);
    }

    writeln!(out, "\nInstalled Applications:")?;
    for entry in &installed {
        writeln!(out, " - {}", entry.name)?;
    }
    let Some(name) = prompt(
        input,
        out,
        "Enter the name of the application to uninstall: ",
    )?
    else {
        return Ok(State::Exit);
    };
    report(session.uninstaller.uninstall(&session.config, &name))?;
    Ok(State::Menu)
}

/// Look up the application for a number typed by the user.
pub(crate) fn select<'a>(
    config: &'a AppConfig,
    answer: &str,
) -> batchinst_common::Result<&'a AppDescriptor> {
    let invalid = || Error::InvalidSelection(answer.to_string());
    if answer.is_empty() || !answer.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    answer
        .parse::<usize>()
        .ok()
        .and_then(|number| config.get(number))
        .ok_or_else(invalid)
}

/// Print `message` and read one trimmed line, `None` on end of input.
fn prompt(input: &mut impl BufRead, out: &mut impl Write, message: &str) -> Result<Option<String>> {
    write!(out, "{message}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn select_validates_input() {
        let config = AppConfig::parse("# header\nApp1;http://e.com/a.exe;true").unwrap();

        assert_eq!(select(&config, "2").unwrap().name, "App1");
        for answer in ["1", "3", "", "two", "-2", "+2", "2.0"] {
            let err = select(&config, answer).unwrap_err();
            assert!(matches!(err, Error::InvalidSelection(_)), "{answer}: {err}");
        }
    }

    #[cfg(unix)]
    mod scripted {
        use super::*;
        use crate::test_utils::{read, session};

        const CONFIG: &str = "App1;http://example.com/a.exe;true {installer};true\n\
                              App2;http://example.com/b.exe;true {installer};true\n";

        fn drive(session: &Session<crate::test_utils::FakeDownloader>, script: &str) -> String {
            let mut out = Vec::new();
            run(session, &mut Cursor::new(script.to_string()), &mut out).unwrap();
            String::from_utf8(out).unwrap()
        }

        #[test]
        fn exit_choice() {
            let (_dir, session) = session(CONFIG, false);
            let out = drive(&session, "4\n");

            assert!(out.contains("Available Applications:\n1. App1\n2. App2\n"));
            assert!(out.ends_with("Exiting the installer. Goodbye!\n"));
        }

        #[test]
        fn end_of_input_exits() {
            let (_dir, session) = session(CONFIG, false);
            let out = drive(&session, "");
            assert!(out.ends_with("Goodbye!\n"));
        }

        #[test]
        fn install_by_number() {
            let (_dir, session) = session(CONFIG, false);
            drive(&session, "1\n2\n4\n");

            let installed = session.log.read_all().unwrap();
            assert_eq!(installed.keys().collect::<Vec<_>>(), vec!["App2"]);
        }

        #[test]
        fn invalid_number_keeps_looping() {
            let (_dir, session) = session(CONFIG, false);
            let out = drive(&session, "1\n7\n9\n4\n");

            assert_eq!(out.matches("\nMenu:\n").count(), 3);
            assert!(!session.log.path().exists());
        }

        #[test]
        fn install_all_then_uninstall() {
            let (_dir, session) = session(CONFIG, false);
            let out = drive(&session, "2\n3\nApp1\n4\n");

            assert!(out.contains("Installed Applications:\n - App1\n - App2\n"));
            let log = read(session.log.path());
            assert!(log.starts_with("App2;"), "{log}");
            assert_eq!(log.lines().count(), 1);
        }

        #[test]
        fn installed_listed_in_log_order() {
            let (_dir, session) = session(CONFIG, false);
            std::fs::write(
                session.log.path(),
                "Zed;downloads/zed.exe\nAlpha;downloads/alpha.exe\n",
            )
            .unwrap();

            let out = drive(&session, "3\nnone\n4\n");

            assert!(out.contains("Installed Applications:\n - Zed\n - Alpha\n"), "{out}");
        }

        #[test]
        fn uninstall_with_empty_log() {
            let (_dir, session) = session(CONFIG, false);
            let out = drive(&session, "3\n4\n");
            assert!(out.contains("No applications to uninstall."));
        }

        #[test]
        fn uninstall_unknown_name() {
            let (_dir, session) = session(CONFIG, false);
            std::fs::write(session.log.path(), "App1;downloads/a.exe\n").unwrap();

            drive(&session, "3\nApp9\n4\n");

            assert_eq!(read(session.log.path()), "App1;downloads/a.exe\n");
        }
    }
}
