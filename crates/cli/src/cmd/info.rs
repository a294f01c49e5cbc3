use anyhow::Result;

use rolypoly_lib::platform::Platform;

use crate::output::{print_json, print_stat};

pub fn cmd_info(json: bool) -> Result<()> {
  let platform = Platform::current();

  if json {
    let value = match &platform {
      Some(p) => serde_json::json!({ "platform": p.triple(), "os": p.os, "arch": p.arch }),
      None => serde_json::json!({ "platform": null }),
    };
    return print_json(&value);
  }

  println!("System:");
  match platform {
    Some(p) => {
      print_stat("Platform", &p.triple());
      print_stat("OS", p.os.as_str());
      print_stat("Arch", p.arch.as_str());
    }
    None => println!("Could not detect platform."),
  }
  Ok(())
}
