fn main() -> std::process::ExitCode {
    p3d_uploader_lib::run()
}
