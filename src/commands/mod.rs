/*!
 * Subcommand implementations that do more than call into the builder
 */

pub mod init;
