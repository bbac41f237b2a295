/// Labels that come with advice text and a downloadable report.
pub const ADVICE_LABELS: [&str; 2] = ["Insomnia", "Sleep Apnea"];

const INSOMNIA_STEPS: [&str; 7] = [
    "Go to bed and wake up at the same time every day.",
    "Avoid caffeine, alcohol and nicotine for at least 6 hours before bed.",
    "Switch off gadgets and bright lights at least 1 hour before bed.",
    "Practice relaxation techniques such as deep breathing, prayer or journaling.",
    "Keep the bedroom temperature and lighting comfortable.",
    "See a psychologist if the problem lasts longer than 2 weeks.",
    "Avoid long naps (20 to 30 minutes at most).",
];

const SLEEP_APNEA_STEPS: [&str; 7] = [
    "Consult an ENT or pulmonary specialist.",
    "Use a CPAP device if your doctor recommends one.",
    "Lose weight if your BMI is high.",
    "Sleep on your side rather than on your back.",
    "Avoid alcohol, smoking and sedatives.",
    "Keep a healthy diet and exercise regularly.",
    "Consider a sleep study (polysomnography).",
];

/// Advice for `label`, addressed to `name`; `None` for labels without advice.
pub fn advice_for(label: &str, name: &str) -> Option<String> {
    let (heading, steps) = match label {
        "Insomnia" => (
            format!("\u{1F4A1} Advice for {} (Insomnia):", name),
            &INSOMNIA_STEPS,
        ),
        "Sleep Apnea" => (
            format!("Advice for {} (Sleep Apnea):", name),
            &SLEEP_APNEA_STEPS,
        ),
        _ => return None,
    };

    let mut text = heading;
    text.push('\n');
    for (i, step) in steps.iter().enumerate() {
        text.push_str(&format!("\n{}. {}", i + 1, step));
    }
    Some(text)
}
