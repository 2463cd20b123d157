use phosphor_cheat::core::MachineInfo;
use phosphor_cheat_machines::registry;

#[test]
fn test_all_machines_registered_and_sorted() {
    let names: Vec<_> = registry::all().iter().map(|e| e.name).collect();
    assert_eq!(names, ["dkong", "joust", "missile", "pacman", "robotron"]);
}

#[test]
fn test_find_by_name() {
    let entry = registry::find("pacman").unwrap();
    assert_eq!(entry.layout.driver, "pacman");
    assert!(registry::find("galaga").is_none());
}

#[test]
fn test_layouts_are_well_formed() {
    for entry in registry::all() {
        let machine = entry.create();
        assert_eq!(machine.driver_name(), entry.layout.driver);
        assert!(machine.frames_per_second() > 55.0 && machine.frames_per_second() < 65.0);
        for (cpu, layout) in entry.layout.cpus.iter().enumerate() {
            let mut previous_end = None;
            for region in layout.regions {
                assert!(region.start <= region.end, "{}: {}", entry.name, region.label);
                assert!(region.end <= layout.address_mask());
                if let Some(end) = previous_end {
                    assert!(region.start > end, "{}: regions overlap", entry.name);
                }
                previous_end = Some(region.end);
            }
            assert_eq!(machine.write_regions(cpu).len(), layout.regions.len());
        }
    }
}

#[test]
fn test_frame_rates() {
    let fps = |name| registry::find(name).unwrap().layout.fps;
    assert!((fps("pacman") - 60.606).abs() < 0.01);
    assert!((fps("joust") - 60.096).abs() < 0.01);
    assert!((fps("missile") - 61.035).abs() < 0.01);
}
