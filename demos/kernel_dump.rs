use flamekit::{Context, Flame, export_kernels};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let json = r#"
{
  "name": "kernel-dump",
  "preserve_z": true,
  "layers": [
    {
      "xforms": [
        { "weight": 2.0, "affine": [0.7, 0.2, -0.2, 0.7, 0.1, 0.0],
          "variations": [ { "name": "pre_blur", "amount": 0.05 },
                          { "name": "hole2", "amount": 0.5, "params": { "a": 1.2 } },
                          { "name": "linearT", "amount": 0.5, "params": { "lT_powX": 1.5 } } ] },
        { "weight": 1.0,
          "variations": [ { "name": "truchet", "amount": 1.0, "params": { "size": 2.0 } },
                          { "name": "sym_ng17", "amount": 0.3 } ] }
      ],
      "final_xforms": [
        { "variations": [ { "name": "post_axis_symmetry_wf", "amount": 1.0, "params": { "axis": 1 } } ] }
      ]
    }
  ]
}
"#;

    let flame = Flame::from_json_reader(json.as_bytes())?;
    let ctx = Context::seeded(0).with_preserve_z(flame.preserve_z());
    let bundle = export_kernels(&flame, &ctx);

    println!("// varset {}", bundle.varset_id);
    for entry in &bundle.entries {
        println!(
            "// layer {} {}xform {}",
            entry.layer,
            if entry.final_xform { "final " } else { "" },
            entry.xform
        );
        print!("{}", entry.source);
    }
    for name in &bundle.unsupported {
        eprintln!("no kernel form: {name}");
    }
    Ok(())
}
