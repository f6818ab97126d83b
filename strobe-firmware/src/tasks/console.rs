//! Console UART task
//!
//! Reads newline-terminated commands and runs them against the blinker.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};
use strobe_core::shell::{parse_command, LineBuffer, LineEvent};

use super::blink::FwBlinker;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Longest accepted command line
const LINE_LEN: usize = 80;

/// Console task - one reply line per command
#[embassy_executor::task]
pub async fn console_task(
    mut rx: BufferedUartRx,
    mut tx: BufferedUartTx,
    blinker: &'static FwBlinker,
) {
    info!("Console task started");

    let mut lines: LineBuffer<LINE_LEN> = LineBuffer::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        let n = match rx.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                continue;
            }
        };

        for &byte in &buf[..n] {
            match lines.push(byte) {
                LineEvent::Line(line) => {
                    let reply = handle_line(line, blinker).await;
                    if let Err(e) = write_line(&mut tx, reply).await {
                        warn!("UART write error: {:?}", e);
                    }
                }
                LineEvent::Overflow => warn!("Console line too long, dropped"),
                LineEvent::Pending => {}
            }
        }
    }
}

/// Parse and run one command line
async fn handle_line(line: &[u8], blinker: &'static FwBlinker) -> &'static str {
    let Ok(text) = core::str::from_utf8(line) else {
        return "invalid input";
    };

    let command = match parse_command(text) {
        Ok(command) => command,
        Err(e) => return e.message(),
    };
    debug!("Console command: {:?}", command);

    match blinker.execute(command).await {
        Ok(()) => "ok",
        Err(e) => {
            warn!("Console command failed: {:?}", e);
            e.message()
        }
    }
}

async fn write_line(
    tx: &mut BufferedUartTx,
    text: &str,
) -> Result<(), embassy_rp::uart::Error> {
    tx.write_all(text.as_bytes()).await?;
    tx.write_all(b"\r\n").await
}
