fn main() {
    vitalwatch_lib::run()
}
