use std::process::exit;

use rbdcls::commands::rbd_dencoder::RbdDencoderCommand;
use rbdcls::commands::Command;

fn main() {
    let mut args = std::env::args_os();
    exit(RbdDencoderCommand.run(&mut args))
}
