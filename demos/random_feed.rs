use percent_gauge::{submit, Gauge, GaugeCommand, GaugeConfig, Style};
use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    let config = GaugeConfig::builder()
        .title("Random Feed".to_string())
        .style(Style::Donut)
        .build();
    let gauge = Gauge::new(config);

    let (sender, receiver) = mpsc::channel();

    // Push a random value every second and cycle through the styles.
    thread::spawn(move || {
        let mut rng = rand::rng();
        let styles = [
            Style::Bar,
            Style::Pie,
            Style::Needle,
            Style::Donut,
            Style::HalfDial,
        ];
        for round in 0.. {
            let value = rng.random_range(0.0..=100.0_f64);
            let Ok(submission) = submit("Random feed", &format!("{value:.1}")) else {
                continue;
            };
            let commands = [
                GaugeCommand::SetStyle(styles[round % styles.len()]),
                GaugeCommand::Show(submission),
            ];
            if commands.into_iter().any(|cmd| sender.send(cmd).is_err()) {
                break;
            }
            thread::sleep(Duration::from_secs(1));
        }
    });

    println!("Showing a random value each second; close the window to exit.");
    gauge.show_with_commands(receiver)
}
