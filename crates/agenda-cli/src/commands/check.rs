use agenda_core::Config;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let agenda = config.agenda();
    let problems = agenda.validate();

    if problems.is_empty() {
        let items: usize = agenda.days.iter().map(|d| d.len()).sum();
        println!("ok: {} days, {items} items", agenda.days.len());
        return Ok(());
    }

    for problem in &problems {
        println!("{problem}");
    }
    Err(format!("agenda has {} problem(s)", problems.len()).into())
}
