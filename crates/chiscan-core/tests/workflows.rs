use chiscan::core::io::format::StructureFormat;
use chiscan::core::topology::registry::ChiDefinitionTable;
use chiscan::engine::config::{
    AggregateConfig, AggregateConfigBuilder, BatchConfig, BatchConfigBuilder, ConvertConfig,
    ConvertConfigBuilder,
};
use chiscan::engine::error::EngineError;
use chiscan::engine::progress::{Progress, ProgressReporter};
use chiscan::engine::session::Session;
use chiscan::workflows::aggregate::aggregate;
use chiscan::workflows::batch::run_directory;
use chiscan::workflows::chi_angles::compute_chi_angles;
use chiscan::workflows::convert::convert_all;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tempfile::tempdir;

const STRUCTURE: &str = "\
HEADER    TEST STRUCTURE
ATOM      1  N   LEU A  12      11.104   6.134  -6.504  1.00 20.00           N
ATOM      2  CA  LEU A  12      11.639   6.071  -5.147  1.00 20.00           C
ATOM      3  CB  LEU A  12      12.346   7.413  -4.851  1.00 20.00           C
ATOM      4  CG  LEU A  12      13.682   7.698  -5.553  1.00 20.00           C
ATOM      5  CD1 LEU A  12      14.137   9.125  -5.268  1.00 20.00           C
ATOM      6  CD2 LEU A  12      14.763   6.717  -5.111  1.00 20.00           C
ATOM      7  N   GLY A  13      10.569   5.730  -4.409  1.00 20.00           N
ATOM      8  CA  GLY A  13      10.221   5.610  -3.001  1.00 20.00           C
ATOM      9  N   ALA A  14       9.105   4.654  -2.708  1.00 20.00           N
ATOM     10  CA  ALA A  14       8.712   4.388  -1.318  1.00 20.00           C
ATOM     11  CB  ALA A  14       7.505   3.455  -1.297  1.00 20.00           C
ATOM     12  N   LEU A  15       9.894   3.755  -0.578  1.00 20.00           N
ATOM     13  CA  LEU A  15       9.744   3.431   0.843  1.00 20.00           C
ATOM     14  CB  LEU A  15      10.954   2.653   1.363  1.00 20.00           C
ATOM     15  CG  LEU A  15      11.168   1.254   0.792  1.00 20.00           C
ATOM     16  N   SER A  16       8.612   4.061   1.513  1.00 20.00           N
ATOM     17  CA  SER A  16       8.331   3.860   2.931  1.00 20.00           C
ATOM     18  CB ASER A  16       7.073   4.615   3.354  0.50 20.00           C
ATOM     19  CB BSER A  16       7.120   4.580   3.400  0.50 20.00           C
ATOM     20  OG  SER A  16       7.256   6.013   3.211  1.00 20.00           O
TER
HETATM   21 CA    CA A 201       5.000   5.000   5.000  1.00 20.00          CA
HETATM   22  O   HOH A 301       3.000   3.000   3.000  1.00 20.00           O
ATOM     23  N   LEU B   1      21.104   6.134  -6.504  1.00 20.00           N
ATOM     24  CA  LEU B   1      21.639   6.071  -5.147  1.00 20.00           C
ATOM     25  CB  LEU B   1      22.346   7.413  -4.851  1.00 20.00           C
ATOM     26  CG  LEU B   1      23.682   7.698  -5.553  1.00 20.00           C
END
";

const EXPECTED_REPORT: &str = "\
Residue Chi1 Chi2 Chi3 Chi4
12 LEU -71.99 173.24 N/A N/A
13 GLY N/A N/A N/A N/A
14 ALA N/A N/A N/A N/A
15 LEU -66.13 MISSING N/A N/A
16 SER ERROR N/A N/A N/A
";

fn write_structure(dir: &Path, file_name: &str) {
    fs::write(dir.join(file_name), STRUCTURE).unwrap();
}

#[test]
fn chi_report_covers_padding_missing_atoms_and_alternate_locations() {
    let dir = tempdir().unwrap();
    write_structure(dir.path(), "fold_8pqm_af3_model_0.pdb");

    let mut session = Session::new();
    let outcomes = run_directory(
        &mut session,
        dir.path(),
        &ChiDefinitionTable::standard(),
        &BatchConfig::default(),
        &ProgressReporter::new(),
    )
    .unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].residues, 5);
    assert_eq!(outcomes[0].missing, 1);
    assert_eq!(outcomes[0].errors, 1);
    let report = fs::read_to_string(dir.path().join("fold_8pqm_af3_model_0_chi_angles.dat")).unwrap();
    assert_eq!(report, EXPECTED_REPORT);
    assert!(!report.contains("HOH"));
    assert!(!report.contains(" CA "));
}

#[test]
fn session_is_empty_after_each_structure() {
    let dir = tempdir().unwrap();
    write_structure(dir.path(), "one.pdb");
    let mut session = Session::new();

    compute_chi_angles(
        &mut session,
        &dir.path().join("one.pdb"),
        &dir.path().join("one_chi_angles.dat"),
        &ChiDefinitionTable::standard(),
        "A",
    )
    .unwrap();
    assert!(session.object_names().is_empty());
}

#[test]
fn rerunning_the_batch_reproduces_identical_reports() {
    let dir = tempdir().unwrap();
    write_structure(dir.path(), "a_1abc.pdb");
    let report = dir.path().join("a_1abc_chi_angles.dat");
    let mut session = Session::new();
    let table = ChiDefinitionTable::standard();
    let config = BatchConfig::default();

    run_directory(&mut session, dir.path(), &table, &config, &ProgressReporter::new()).unwrap();
    let first = fs::read(&report).unwrap();
    run_directory(&mut session, dir.path(), &table, &config, &ProgressReporter::new()).unwrap();
    let second = fs::read(&report).unwrap();

    assert_eq!(first, second);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn batch_visits_files_in_name_order_and_reports_progress() {
    let dir = tempdir().unwrap();
    write_structure(dir.path(), "b.pdb");
    write_structure(dir.path(), "a.PDB");
    fs::write(dir.path().join("notes.txt"), "not a structure").unwrap();

    let events = Mutex::new(Vec::new());
    let reporter = ProgressReporter::with_callback(Box::new(|event| {
        events.lock().unwrap().push(event);
    }));
    let outcomes = run_directory(
        &mut Session::new(),
        dir.path(),
        &ChiDefinitionTable::standard(),
        &BatchConfig::default(),
        &reporter,
    )
    .unwrap();
    drop(reporter);

    let names: Vec<_> = outcomes
        .iter()
        .map(|o| o.report_file.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a_chi_angles.dat", "b_chi_angles.dat"]);

    let events = events.into_inner().unwrap();
    assert_eq!(events.first(), Some(&Progress::BatchStart { total_files: 2 }));
    assert_eq!(
        events[1],
        Progress::FileStart {
            name: "a.PDB".to_string()
        }
    );
    assert!(events.contains(&Progress::Message("a.PDB: 1 MISSING, 1 ERROR".to_string())));
    assert_eq!(events.last(), Some(&Progress::BatchFinish));
}

#[test]
fn directory_without_structures_produces_no_outputs() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("readme.md"), "nothing here").unwrap();
    let mut session = Session::new();

    let outcomes = run_directory(
        &mut session,
        dir.path(),
        &ChiDefinitionTable::standard(),
        &BatchConfig::default(),
        &ProgressReporter::new(),
    )
    .unwrap();
    let converted = convert_all(
        &mut session,
        dir.path(),
        &ConvertConfig::default(),
        &ProgressReporter::new(),
    )
    .unwrap();

    assert!(outcomes.is_empty());
    assert!(converted.is_empty());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn batch_honours_chain_output_dir_and_custom_definitions() {
    let dir = tempdir().unwrap();
    write_structure(dir.path(), "model.pdb");
    let definitions_path = dir.path().join("chi.toml");
    fs::write(&definitions_path, "LEU = [\"N-CA-CB-CG\"]\n").unwrap();
    let table = ChiDefinitionTable::load(&definitions_path).unwrap();

    let out = dir.path().join("reports");
    let config = BatchConfigBuilder::new()
        .chain_id("B")
        .report_suffix(".chi")
        .output_dir(out.clone())
        .build()
        .unwrap();
    run_directory(&mut Session::new(), dir.path(), &table, &config, &ProgressReporter::new())
        .unwrap();

    assert_eq!(
        fs::read_to_string(out.join("model.chi")).unwrap(),
        "Residue Chi1 Chi2 Chi3 Chi4\n1 LEU -71.99 N/A N/A N/A\n"
    );
}

#[test]
fn unreadable_structure_aborts_the_batch() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("broken.cif"), "this is not an mmCIF file\n").unwrap();
    let config = BatchConfigBuilder::new()
        .extensions(vec!["cif".to_string()])
        .build()
        .unwrap();

    let result = run_directory(
        &mut Session::new(),
        dir.path(),
        &ChiDefinitionTable::standard(),
        &config,
        &ProgressReporter::new(),
    );
    assert!(matches!(
        result,
        Err(EngineError::ReadStructure {
            format: StructureFormat::Cif,
            ..
        })
    ));
}

#[test]
fn aggregation_of_a_single_report_matches_the_documented_rows() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("fold_8pqm_af3_model_0_chi_angles.dat"),
        "Residue Chi1 Chi2 Chi3 Chi4\n12 LEU -65.43 174.21 N/A N/A\n13 GLY N/A N/A N/A N/A\n",
    )
    .unwrap();
    let output = dir.path().join("chi_angles.csv");

    let summary = aggregate(
        dir.path(),
        &output,
        &AggregateConfig::default(),
        &ProgressReporter::new(),
    )
    .unwrap();

    assert_eq!(summary.files, 1);
    assert_eq!(summary.rows, 2);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "pdb_ID,residue_number,residue_name,CHI1,CHI2,CHI3,CHI4\n\
         8pqm,12,LEU,-65.43,174.21,N/A,N/A\n\
         8pqm,13,GLY,N/A,N/A,N/A,N/A\n"
    );
}

#[test]
fn badly_named_report_aborts_aggregation_without_output() {
    let dir = tempdir().unwrap();
    let reports = dir.path().join("reports");
    fs::create_dir(&reports).unwrap();
    fs::write(reports.join("a_good_chi_angles.dat"), "Residue Chi1 Chi2 Chi3 Chi4\n").unwrap();
    fs::write(reports.join("plain.dat_chi_angles.dat"), "Residue Chi1 Chi2 Chi3 Chi4\n").unwrap();
    let output = dir.path().join("out.csv");

    let config = AggregateConfigBuilder::new().delimiter("-").build().unwrap();
    let result = aggregate(&reports, &output, &config, &ProgressReporter::new());

    match result {
        Err(EngineError::FileNamePattern { path, .. }) => {
            assert_eq!(path.file_name().unwrap(), "a_good_chi_angles.dat")
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(!output.exists());
}

#[test]
fn empty_report_directory_yields_header_only_csv() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("out.csv");
    let summary = aggregate(
        dir.path(),
        &output,
        &AggregateConfig::default(),
        &ProgressReporter::new(),
    )
    .unwrap();

    assert_eq!(summary.rows, 0);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "pdb_ID,residue_number,residue_name,CHI1,CHI2,CHI3,CHI4\n"
    );
}

#[test]
fn chi_reports_feed_the_aggregator() {
    let dir = tempdir().unwrap();
    write_structure(dir.path(), "fold_8pqm_af3_model_0.pdb");
    run_directory(
        &mut Session::new(),
        dir.path(),
        &ChiDefinitionTable::standard(),
        &BatchConfig::default(),
        &ProgressReporter::new(),
    )
    .unwrap();

    let output = dir.path().join("all.csv");
    let config = AggregateConfigBuilder::new()
        .include_status_columns(true)
        .build()
        .unwrap();
    aggregate(dir.path(), &output, &config, &ProgressReporter::new()).unwrap();

    let csv = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(
        lines[4],
        "8pqm,15,LEU,-66.13,MISSING,N/A,N/A,value,missing,not_applicable,not_applicable"
    );
    assert_eq!(
        lines[5],
        "8pqm,16,SER,ERROR,N/A,N/A,N/A,error,not_applicable,not_applicable,not_applicable"
    );
}

#[test]
fn converted_structures_give_the_same_chi_angles() {
    let dir = tempdir().unwrap();
    write_structure(dir.path(), "model.pdb");
    let mut session = Session::new();

    let to_cif = ConvertConfigBuilder::new()
        .source(StructureFormat::Pdb)
        .target(StructureFormat::Cif)
        .build()
        .unwrap();
    let written = convert_all(&mut session, dir.path(), &to_cif, &ProgressReporter::new()).unwrap();
    assert_eq!(written, vec![dir.path().join("model.cif")]);
    assert!(session.object_names().is_empty());

    let cif_config = BatchConfigBuilder::new()
        .extensions(vec!["cif".to_string()])
        .output_dir(dir.path().join("from_cif"))
        .build()
        .unwrap();
    run_directory(
        &mut session,
        dir.path(),
        &ChiDefinitionTable::standard(),
        &cif_config,
        &ProgressReporter::new(),
    )
    .unwrap();
    assert_eq!(
        fs::read_to_string(dir.path().join("from_cif").join("model_chi_angles.dat")).unwrap(),
        EXPECTED_REPORT
    );

    fs::remove_file(dir.path().join("model.pdb")).unwrap();
    let back = convert_all(&mut session, dir.path(), &ConvertConfig::default(), &ProgressReporter::new())
        .unwrap();
    assert_eq!(back, vec![dir.path().join("model.pdb")]);
    let report = compute_chi_angles(
        &mut session,
        &back[0],
        &dir.path().join("round_trip.dat"),
        &ChiDefinitionTable::standard(),
        "A",
    )
    .unwrap();
    assert_eq!(report.rows.len(), 5);
    assert_eq!(
        fs::read_to_string(dir.path().join("round_trip.dat")).unwrap(),
        EXPECTED_REPORT
    );
}

fn serine_cif(residues: &[(&str, isize)]) -> String {
    let mut cif = String::from(
        "data_serines\n\
         loop_\n\
         _atom_site.group_PDB\n\
         _atom_site.id\n\
         _atom_site.type_symbol\n\
         _atom_site.label_atom_id\n\
         _atom_site.label_alt_id\n\
         _atom_site.label_comp_id\n\
         _atom_site.label_asym_id\n\
         _atom_site.label_entity_id\n\
         _atom_site.label_seq_id\n\
         _atom_site.pdbx_PDB_ins_code\n\
         _atom_site.Cartn_x\n\
         _atom_site.Cartn_y\n\
         _atom_site.Cartn_z\n\
         _atom_site.occupancy\n\
         _atom_site.B_iso_or_equiv\n\
         _atom_site.pdbx_formal_charge\n\
         _atom_site.auth_seq_id\n\
         _atom_site.auth_comp_id\n\
         _atom_site.auth_asym_id\n\
         _atom_site.auth_atom_id\n\
         _atom_site.pdbx_PDB_model_num\n",
    );
    let atoms = [
        ("N", "N", 0.0, 1.0, 0.0),
        ("C", "CA", 0.0, 0.0, 0.0),
        ("C", "CB", 0.0, 0.0, 1.0),
        ("O", "OG", 0.0, -1.0, 1.0),
    ];
    let mut serial = 0;
    for (entity, (chain, seq_id)) in residues.iter().enumerate() {
        for (element, name, x, y, z) in atoms {
            serial += 1;
            cif.push_str(&format!(
                "ATOM {serial} {element} {name} . SER {chain} {} {seq_id} ? {x:.3} {y:.3} {z:.3} 1.00 0.00 ? {seq_id} SER {chain} {name} 1\n",
                entity + 1
            ));
        }
    }
    cif
}

#[test]
fn cif_to_pdb_conversion_refuses_chain_ids_longer_than_one_character() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("paired.cif"), serine_cif(&[("A", 5), ("AB", 7)])).unwrap();
    let mut session = Session::new();

    let report = compute_chi_angles(
        &mut session,
        &dir.path().join("paired.cif"),
        &dir.path().join("paired.dat"),
        &ChiDefinitionTable::standard(),
        "A",
    )
    .unwrap();
    assert_eq!(report.rows.len(), 1);

    let result = convert_all(&mut session, dir.path(), &ConvertConfig::default(), &ProgressReporter::new());
    assert!(matches!(
        result,
        Err(EngineError::WriteStructure {
            format: StructureFormat::Pdb,
            ..
        })
    ));
    assert!(!dir.path().join("paired.pdb").exists());
}

#[test]
fn cif_to_pdb_conversion_refuses_residue_numbers_wider_than_the_pdb_field() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("long.cif"), serine_cif(&[("A", 10000)])).unwrap();
    let mut session = Session::new();

    let result = convert_all(&mut session, dir.path(), &ConvertConfig::default(), &ProgressReporter::new());
    match result {
        Err(EngineError::WriteStructure { path, .. }) => {
            assert_eq!(path, dir.path().join("long.pdb"))
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(!dir.path().join("long.pdb").exists());
}
