use clap::Parser;
use dotenv::dotenv;
use log::info;
use std::error::Error;
use std::sync::{ Arc, Mutex };
use std::time::Duration;
use tokio::io::{ AsyncBufReadExt, BufReader };
use tokio_util::sync::CancellationToken;

use travel_guardian::assistant::{ ChatSession, HttpProxyTransport, SessionProfile };
use travel_guardian::cli::ChatArgs;
use travel_guardian::models::chat::{ Language, Message, Sender };

const HELP: &str = "Commands:
  /quick          list quick questions
  /quick <n>      send quick question n
  /lang <name>    set the response language
  /location <x>   set your location
  /history        reprint the conversation
  /quit           leave (or Ctrl-D, or Ctrl-C at the prompt)
Ctrl-C while waiting cancels the pending question.";

/// Routes Ctrl-C: cancels the question in flight if there is one, otherwise asks the
/// REPL to quit. One instance lives for the whole session.
#[derive(Clone, Default)]
struct Interrupts {
    pending: Arc<Mutex<Option<CancellationToken>>>,
    quit: CancellationToken,
}

impl Interrupts {
    fn slot(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin_question(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.slot() = Some(token.clone());
        token
    }

    fn end_question(&self) {
        self.slot().take();
    }

    fn interrupt(&self) {
        match self.slot().take() {
            Some(token) => token.cancel(),
            None => self.quit.cancel(),
        }
    }

    fn watch_ctrl_c(&self) {
        let interrupts = self.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                interrupts.interrupt();
            }
        });
    }
}

fn print_message(message: &Message) {
    let who = match message.sender {
        Sender::User => "you",
        Sender::Bot => "assistant",
    };
    println!("[{}] {}:", message.display_time(), who);
    for line in message.lines() {
        println!("  {}", line);
    }
}

fn print_quick_replies(session: &ChatSession) {
    for (i, text) in session.quick_replies().iter().enumerate() {
        println!("  {}. {}", i + 1, text);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = ChatArgs::parse();

    let profile = if args.widget { SessionProfile::widget() } else { SessionProfile::full_page() };
    let transport = HttpProxyTransport::new(&args.proxy_url)?;
    let mut session = ChatSession::new(profile).with_request_timeout(
        Duration::from_secs(args.request_timeout_secs)
    );
    if let Some(lang) = &args.language {
        session.set_language(lang.parse::<Language>()?)?;
    }
    if let Some(location) = &args.location {
        session.set_location(location.clone());
    }
    info!("Chat session {} talking to {}", session.id(), transport.endpoint());

    println!("📍 {} | 🗣️ {}  (type /help for commands)", session.location(), session.language());
    for message in session.transcript() {
        print_message(message);
    }

    let interrupts = Interrupts::default();
    interrupts.watch_ctrl_c();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = interrupts.quit.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            break;
        };
        let input = line.trim_end();
        let (command, rest) = match input.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (input, ""),
        };

        let text = match command {
            "/quit" | "/exit" => break,
            "/help" => {
                println!("{}", HELP);
                continue;
            }
            "/history" => {
                for message in session.transcript() {
                    print_message(message);
                }
                continue;
            }
            "/quick" if rest.is_empty() => {
                print_quick_replies(&session);
                continue;
            }
            "/quick" => {
                let picked = rest
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| session.quick_replies().get(i).copied());
                match picked {
                    Some(text) => text.to_string(),
                    None => {
                        println!("Pick a number from the list:");
                        print_quick_replies(&session);
                        continue;
                    }
                }
            }
            "/lang" => {
                match rest.parse::<Language>() {
                    Ok(lang) => match session.set_language(lang) {
                        Ok(()) => println!("Responses will be in {}.", lang),
                        Err(e) => println!("{}", e),
                    },
                    Err(e) => println!("{}", e),
                }
                continue;
            }
            "/location" => {
                if !rest.is_empty() {
                    session.set_location(rest);
                }
                println!("📍 {}", session.location());
                continue;
            }
            _ => input.to_string(),
        };

        let cancel = interrupts.begin_question();
        if !text.trim().is_empty() {
            println!("  ...");
        }
        let result = session.send_with_cancel(&transport, &text, &cancel).await;
        interrupts.end_question();

        match result {
            Ok(Some(reply)) => print_message(reply),
            Ok(None) => {}
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_cancels_pending_question_only() {
        let interrupts = Interrupts::default();
        let cancel = interrupts.begin_question();

        interrupts.interrupt();

        assert!(cancel.is_cancelled());
        assert!(!interrupts.quit.is_cancelled());
    }

    #[test]
    fn interrupt_at_idle_prompt_quits() {
        let interrupts = Interrupts::default();
        let cancel = interrupts.begin_question();
        interrupts.end_question();

        interrupts.interrupt();

        assert!(!cancel.is_cancelled());
        assert!(interrupts.quit.is_cancelled());
    }

    #[test]
    fn every_question_gets_a_fresh_token() {
        let interrupts = Interrupts::default();
        let first = interrupts.begin_question();
        interrupts.interrupt();
        interrupts.end_question();

        let second = interrupts.begin_question();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());

        interrupts.interrupt();
        assert!(second.is_cancelled());
        assert!(!interrupts.quit.is_cancelled());
    }
}
