use smarttask::output::{format_human, HumanOutput};

#[test]
fn format_human_includes_sections() {
    let mut human = HumanOutput::new("Task created");
    human.push_summary("ID", "01hzx");
    human.push_detail("📅 Schedule follow-up reminder");
    human.push_warning("changes are not saved: disk full");
    human.push_next_step("smarttask start 01hzx");

    let rendered = format_human(&human);
    assert!(rendered.contains("Task created"));
    assert!(rendered.contains("Summary:"));
    assert!(rendered.contains("- ID: 01hzx"));
    assert!(rendered.contains("Details:"));
    assert!(rendered.contains("- 📅 Schedule follow-up reminder"));
    assert!(rendered.contains("Warnings:"));
    assert!(rendered.contains("- changes are not saved: disk full"));
    assert!(rendered.contains("Next steps:"));
    assert!(rendered.contains("- smarttask start 01hzx"));
}

#[test]
fn format_human_omits_empty_sections() {
    let human = HumanOutput::new("Tasks");
    let rendered = format_human(&human);
    assert_eq!(rendered, "Tasks");
}
